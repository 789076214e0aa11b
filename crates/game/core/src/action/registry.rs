use std::collections::HashMap;

use super::wire::{self, OpCode, WireError, WireMessage, WirePayload, keys};
use super::CommandKind;

/// Turns an [`OpCode::AbilityUsed`] payload back into a command.
pub type CommandDecoder = fn(&WirePayload) -> Result<CommandKind, WireError>;

/// Maps `command_type` tags to decoders.
///
/// Populated once at startup and shared read-only by the inbound side of the
/// network layer.
#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    decoders: HashMap<&'static str, CommandDecoder>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that understands every built-in [`CommandKind`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("move", CommandKind::decode_move);
        registry.register("attack", CommandKind::decode_attack);
        registry
    }

    /// Adds or replaces the decoder for `tag`.
    pub fn register(&mut self, tag: &'static str, decoder: CommandDecoder) {
        self.decoders.insert(tag, decoder);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    pub fn decode_command(&self, payload: &WirePayload) -> Result<CommandKind, WireError> {
        payload.expect_op(OpCode::AbilityUsed)?;
        let tag = payload.field(keys::COMMAND_TYPE)?;
        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| WireError::UnknownCommandType(tag.to_owned()))?;
        decoder(payload)
    }

    pub fn decode(&self, payload: &WirePayload) -> Result<WireMessage, WireError> {
        match payload.op_code {
            OpCode::AbilityUsed => self.decode_command(payload).map(WireMessage::Ability),
            OpCode::TurnEnded => wire::decode_turn_ended(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_are_rejected() {
        let registry = CommandRegistry::with_defaults();
        let payload =
            WirePayload::new(OpCode::AbilityUsed).with_field(keys::COMMAND_TYPE, "teleport");

        assert_eq!(
            registry.decode(&payload),
            Err(WireError::UnknownCommandType("teleport".into()))
        );
        assert!(registry.contains("move"));
        assert!(!CommandRegistry::new().contains("move"));
    }

    #[test]
    fn missing_command_type_is_rejected() {
        let registry = CommandRegistry::with_defaults();
        let payload = WirePayload::new(OpCode::AbilityUsed);

        assert_eq!(
            registry.decode(&payload),
            Err(WireError::MissingField(keys::COMMAND_TYPE.into()))
        );
    }
}
