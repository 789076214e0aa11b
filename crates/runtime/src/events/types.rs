//! Event types for different topics.

use game_core::{
    CellCoord, Command, GameResult, Origin, PlayerNumber, TurnContext, TurnTransition, UnitId,
};
use serde::{Deserialize, Serialize};

/// Game and turn lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    GameInitialized,
    GameStarted { origin: Origin },
    TurnStarted { context: TurnContext },
    TurnEnded { transition: TurnTransition },
    GameEnded { result: GameResult },
}

/// Unit membership, selection and combat results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnitEvent {
    Added {
        unit: UnitId,
        owner: PlayerNumber,
        cell: Option<CellCoord>,
    },
    Removed {
        unit: UnitId,
        owner: PlayerNumber,
    },
    Selected {
        unit: UnitId,
    },
    Deselected {
        unit: UnitId,
    },
    /// The unit is done for this turn.
    Finished {
        unit: UnitId,
    },
    Moved {
        unit: UnitId,
        from: CellCoord,
        to: CellCoord,
        cost: u32,
    },
    Attacked {
        attacker: UnitId,
        target: UnitId,
        damage: u32,
        remaining_hit_points: u32,
    },
}

/// Executed commands, local and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityEvent {
    Used { command: Command },
}
