//! Commands: serializable, replayable descriptions of one ability use.
//!
//! A [`Command`] pairs what happened ([`CommandKind`]) with where it came
//! from ([`Origin`]). Every instance of a session executes the same command
//! stream, so the origin is what keeps replayed commands from being mirrored
//! back onto the network.
//!
//! # Module Structure
//!
//! - `wire`: flat key/value payloads exchanged between instances
//! - `registry`: string tag to decoder table used when reading payloads

mod registry;
mod wire;

pub use registry::{CommandDecoder, CommandRegistry};
pub use wire::{OpCode, WireError, WireMessage, WirePayload, keys};

use crate::state::{CellCoord, UnitId};
use crate::turn::TurnContext;

/// Where an action was authored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Origin {
    /// Produced by a player controlled at this instance.
    Local,
    /// Replayed from a peer. Never broadcast again.
    Network,
}

impl Origin {
    #[inline]
    pub fn is_local(self) -> bool {
        matches!(self, Origin::Local)
    }
}

/// Ability uses a unit can perform.
///
/// The snake_case variant name is the `command_type` tag on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    /// Walk along the cheapest path to `destination`.
    Move { unit: UnitId, destination: CellCoord },

    /// Spend an action point to hit an enemy in range.
    Attack { attacker: UnitId, target: UnitId },
}

impl CommandKind {
    /// Wire tag for this variant.
    pub fn tag(&self) -> &'static str {
        self.into()
    }

    /// The unit performing the ability.
    pub fn actor(&self) -> UnitId {
        match self {
            CommandKind::Move { unit, .. } => *unit,
            CommandKind::Attack { attacker, .. } => *attacker,
        }
    }
}

/// One ability use plus its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub kind: CommandKind,
    pub origin: Origin,
}

impl Command {
    pub fn new(kind: CommandKind, origin: Origin) -> Self {
        Self { kind, origin }
    }

    pub fn local(kind: CommandKind) -> Self {
        Self::new(kind, Origin::Local)
    }

    pub fn network(kind: CommandKind) -> Self {
        Self::new(kind, Origin::Network)
    }
}

/// Carried by turn-end notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnTransition {
    pub ended: TurnContext,
    pub origin: Origin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_snake_case_variant_names() {
        let mv = CommandKind::Move {
            unit: UnitId(3),
            destination: CellCoord::new(1, 2),
        };
        let attack = CommandKind::Attack {
            attacker: UnitId(3),
            target: UnitId(4),
        };

        assert_eq!(mv.tag(), "move");
        assert_eq!(attack.tag(), "attack");
        assert_eq!(attack.actor(), UnitId(3));
    }
}
