//! Commands and turn ends survive the trip through payloads and bytes.

use game_core::action::keys;
use game_core::{
    CellCoord, CommandKind, CommandRegistry, OpCode, PlayerNumber, UnitId, WireError, WireMessage,
    WirePayload,
};

fn messages() -> Vec<WireMessage> {
    vec![
        WireMessage::Ability(CommandKind::Move {
            unit: UnitId(12),
            destination: CellCoord::new(-3, 7),
        }),
        WireMessage::Ability(CommandKind::Attack {
            attacker: UnitId(0),
            target: UnitId(u32::MAX),
        }),
        WireMessage::TurnEnded {
            player: PlayerNumber(3),
            turn: 41,
        },
    ]
}

#[test]
fn every_message_survives_framing() {
    let registry = CommandRegistry::with_defaults();

    for message in messages() {
        let bytes = message.encode().to_bytes().unwrap();
        let payload = WirePayload::from_bytes(&bytes).unwrap();
        assert_eq!(registry.decode(&payload).unwrap(), message);
    }
}

#[test]
fn move_payload_layout() {
    let payload = CommandKind::Move {
        unit: UnitId(5),
        destination: CellCoord::new(2, 9),
    }
    .encode();

    assert_eq!(payload.op_code, OpCode::AbilityUsed);
    assert_eq!(payload.field(keys::COMMAND_TYPE), Ok("move"));
    assert_eq!(payload.field(keys::UNIT_ID), Ok("5"));
    assert_eq!(payload.field(keys::DESTINATION_X), Ok("2"));
    assert_eq!(payload.field(keys::DESTINATION_Y), Ok("9"));
}

#[test]
fn custom_decoders_can_be_registered() {
    fn retreat(payload: &WirePayload) -> Result<CommandKind, WireError> {
        Ok(CommandKind::Move {
            unit: UnitId(payload.parse(keys::UNIT_ID)?),
            destination: CellCoord::ORIGIN,
        })
    }

    let mut registry = CommandRegistry::with_defaults();
    registry.register("retreat", retreat);

    let payload = WirePayload::new(OpCode::AbilityUsed)
        .with_field(keys::COMMAND_TYPE, "retreat")
        .with_field(keys::UNIT_ID, 2);

    assert_eq!(
        registry.decode(&payload),
        Ok(WireMessage::Ability(CommandKind::Move {
            unit: UnitId(2),
            destination: CellCoord::ORIGIN,
        }))
    );
}
