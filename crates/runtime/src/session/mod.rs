//! Session state as seen from outside the worker.
//!
//! The authoritative session lives inside the session worker; everything
//! here is either a phase/mode enum or a read-only copy handed out by
//! [`crate::SessionHandle::snapshot`].

use game_core::{GameResult, PlayerNumber, TurnContext, UnitId, World};
use serde::{Deserialize, Serialize};

/// Lifecycle of a session: `Uninitialized → Initialized → TurnActive → Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initialized,
    TurnActive,
    Ended,
}

/// Active input-routing mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionState {
    /// A local human may select a unit.
    AwaitInput,
    /// Somebody other than a local human is playing.
    #[default]
    BlockInput,
    /// A local human has picked a unit and may command it.
    UnitSelected(UnitId),
    GameOver,
}

impl InteractionState {
    pub fn accepts_input(self) -> bool {
        matches!(
            self,
            InteractionState::AwaitInput | InteractionState::UnitSelected(_)
        )
    }
}

/// Read-only copy of a session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub world: World,
    pub phase: SessionPhase,
    pub turn: Option<TurnContext>,
    pub interaction: InteractionState,
    pub result: Option<GameResult>,
}

impl SessionSnapshot {
    pub fn current_player(&self) -> Option<PlayerNumber> {
        self.turn.as_ref().map(|ctx| ctx.current_player)
    }

    /// Units the current player may act with, evaluated against this copy.
    pub fn playable_units(&self) -> Vec<UnitId> {
        self.turn
            .as_ref()
            .map(|ctx| ctx.playable_units(&self.world))
            .unwrap_or_default()
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Ended
    }
}
