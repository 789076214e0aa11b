//! Error types for ability execution.

use crate::state::{CellCoord, PlayerNumber, UnitId, WorldError};

/// Rule violations raised by a single ability.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityError {
    #[error("unit {0} is not on the board")]
    NotOnBoard(UnitId),

    #[error("unit {0} has no movement points left")]
    NoMovementPoints(UnitId),

    #[error("unit {unit} cannot reach {destination}")]
    Unreachable { unit: UnitId, destination: CellCoord },

    #[error("unit {0} has no action points left")]
    NoActionPoints(UnitId),

    #[error("unit {attacker} cannot attack friendly unit {target}")]
    FriendlyTarget { attacker: UnitId, target: UnitId },

    #[error("unit {target} is out of range of {attacker}")]
    OutOfRange { attacker: UnitId, target: UnitId },
}

/// Errors surfaced while executing a command through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("move failed: {0}")]
    Move(AbilityError),

    #[error("attack failed: {0}")]
    Attack(AbilityError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("invalid actor: unit {unit} belongs to {owner}, not the current player {current}")]
    ActorNotCurrent {
        unit: UnitId,
        owner: PlayerNumber,
        current: PlayerNumber,
    },
}
