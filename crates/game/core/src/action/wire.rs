//! Flat payloads exchanged between session instances.
//!
//! A payload is an op code plus string fields. The layout is deliberately
//! dumb so any transport (or a log line) can carry it; bincode framing is
//! available when the `serde` feature is on.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::state::{CellCoord, PlayerNumber, UnitId};

use super::CommandKind;

/// Field names used by the built-in messages.
pub mod keys {
    pub const COMMAND_TYPE: &str = "command_type";
    pub const UNIT_ID: &str = "unit_id";
    pub const TARGET_ID: &str = "target_id";
    pub const DESTINATION_X: &str = "destination_x";
    pub const DESTINATION_Y: &str = "destination_y";
    pub const PLAYER_NUMBER: &str = "player_number";
    pub const TURN: &str = "turn";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OpCode {
    AbilityUsed = 1,
    TurnEnded = 2,
}

impl TryFrom<u8> for OpCode {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OpCode::AbilityUsed),
            2 => Ok(OpCode::TurnEnded),
            other => Err(WireError::UnknownOpCode(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("unknown op code {0}")]
    UnknownOpCode(u8),

    #[error("payload is missing field `{0}`")]
    MissingField(String),

    #[error("unknown command type `{0}`")]
    UnknownCommandType(String),

    #[error("field `{key}` has invalid value `{value}`")]
    InvalidField { key: String, value: String },

    #[error("expected a {expected} payload, got {found}")]
    UnexpectedOpCode { expected: OpCode, found: OpCode },

    #[error("payload framing failed: {0}")]
    Codec(String),
}

/// Op code plus string fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WirePayload {
    pub op_code: OpCode,
    pub fields: BTreeMap<String, String>,
}

impl WirePayload {
    pub fn new(op_code: OpCode) -> Self {
        Self {
            op_code,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Display) -> Self {
        self.fields.insert(key.to_owned(), value.to_string());
        self
    }

    pub fn field(&self, key: &str) -> Result<&str, WireError> {
        self.fields
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| WireError::MissingField(key.to_owned()))
    }

    /// Reads `key` and parses it with [`FromStr`].
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, WireError> {
        let raw = self.field(key)?;
        raw.parse().map_err(|_| WireError::InvalidField {
            key: key.to_owned(),
            value: raw.to_owned(),
        })
    }

    pub fn expect_op(&self, expected: OpCode) -> Result<(), WireError> {
        if self.op_code == expected {
            Ok(())
        } else {
            Err(WireError::UnexpectedOpCode {
                expected,
                found: self.op_code,
            })
        }
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        bincode::serialize(self).map_err(|e| WireError::Codec(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        bincode::deserialize(bytes).map_err(|e| WireError::Codec(e.to_string()))
    }
}

/// Everything one instance tells its peers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMessage {
    Ability(CommandKind),
    TurnEnded { player: PlayerNumber, turn: u32 },
}

impl WireMessage {
    pub fn encode(&self) -> WirePayload {
        match self {
            WireMessage::Ability(kind) => kind.encode(),
            WireMessage::TurnEnded { player, turn } => WirePayload::new(OpCode::TurnEnded)
                .with_field(keys::PLAYER_NUMBER, player.0)
                .with_field(keys::TURN, turn),
        }
    }
}

impl CommandKind {
    /// Writes this command as an [`OpCode::AbilityUsed`] payload.
    pub fn encode(&self) -> WirePayload {
        let payload =
            WirePayload::new(OpCode::AbilityUsed).with_field(keys::COMMAND_TYPE, self.tag());
        match self {
            CommandKind::Move { unit, destination } => payload
                .with_field(keys::UNIT_ID, unit.0)
                .with_field(keys::DESTINATION_X, destination.x)
                .with_field(keys::DESTINATION_Y, destination.y),
            CommandKind::Attack { attacker, target } => payload
                .with_field(keys::UNIT_ID, attacker.0)
                .with_field(keys::TARGET_ID, target.0),
        }
    }

    pub(crate) fn decode_move(payload: &WirePayload) -> Result<Self, WireError> {
        Ok(CommandKind::Move {
            unit: UnitId(payload.parse(keys::UNIT_ID)?),
            destination: CellCoord::new(
                payload.parse(keys::DESTINATION_X)?,
                payload.parse(keys::DESTINATION_Y)?,
            ),
        })
    }

    pub(crate) fn decode_attack(payload: &WirePayload) -> Result<Self, WireError> {
        Ok(CommandKind::Attack {
            attacker: UnitId(payload.parse(keys::UNIT_ID)?),
            target: UnitId(payload.parse(keys::TARGET_ID)?),
        })
    }
}

pub(crate) fn decode_turn_ended(payload: &WirePayload) -> Result<WireMessage, WireError> {
    payload.expect_op(OpCode::TurnEnded)?;
    Ok(WireMessage::TurnEnded {
        player: PlayerNumber(payload.parse(keys::PLAYER_NUMBER)?),
        turn: payload.parse(keys::TURN)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_malformed_fields_are_reported() {
        let payload = WirePayload::new(OpCode::AbilityUsed)
            .with_field(keys::COMMAND_TYPE, "attack")
            .with_field(keys::UNIT_ID, "seven");

        assert_eq!(
            CommandKind::decode_attack(&payload),
            Err(WireError::InvalidField {
                key: keys::UNIT_ID.into(),
                value: "seven".into()
            })
        );

        let payload = payload.with_field(keys::UNIT_ID, 7);
        assert_eq!(
            CommandKind::decode_attack(&payload),
            Err(WireError::MissingField(keys::TARGET_ID.into()))
        );
    }

    #[test]
    fn op_codes_from_raw_bytes() {
        assert_eq!(OpCode::try_from(2), Ok(OpCode::TurnEnded));
        assert_eq!(OpCode::try_from(9), Err(WireError::UnknownOpCode(9)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn truncated_frames_fail_to_decode() {
        let bytes = WireMessage::TurnEnded {
            player: PlayerNumber(1),
            turn: 4,
        }
        .encode()
        .to_bytes()
        .unwrap();

        assert!(matches!(
            WirePayload::from_bytes(&bytes[..bytes.len() / 2]),
            Err(WireError::Codec(_))
        ));
    }
}
