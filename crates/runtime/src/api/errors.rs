//! Unified error types surfaced by the runtime API.
//!
//! [`SessionError`] covers rule and lifecycle rejections produced by the
//! session worker; [`RuntimeError`] wraps those plus worker coordination and
//! setup failures so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ExecuteError, PlayerNumber, TurnError, UnitId, WorldError};

use crate::session::SessionPhase;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Rejections produced by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: SessionPhase,
    },

    #[error("the game has already ended")]
    GameEnded,

    #[error("it is {current}'s turn, not {requested}'s")]
    NotCurrentPlayer {
        current: PlayerNumber,
        requested: PlayerNumber,
    },

    #[error("turn {requested} is over, the session is at turn {current}")]
    StaleTurn { current: u32, requested: u32 },

    #[error("{0} is controlled by this instance and does not accept network commands")]
    LocallyControlled(PlayerNumber),

    #[error("input is not accepted right now")]
    InputBlocked,

    #[error("unit {0} cannot be selected by the current player")]
    UnitNotPlayable(UnitId),

    #[error("turn resolution failed: {0}")]
    Turn(#[from] TurnError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a world before building")]
    MissingWorld,

    #[error("player {0} is not part of the world")]
    UnknownPlayer(PlayerNumber),

    #[error("player {0} was configured twice")]
    DuplicatePlayer(PlayerNumber),

    #[error("player {0} has no controller configured")]
    UnassignedPlayer(PlayerNumber),

    #[error("remote players require a transport")]
    MissingTransport,
}

impl RuntimeError {
    /// The session rejection behind this error, if any.
    pub fn as_session(&self) -> Option<&SessionError> {
        match self {
            RuntimeError::Session(error) => Some(error),
            _ => None,
        }
    }
}
