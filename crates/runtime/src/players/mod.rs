//! Who controls each seat at this instance.
//!
//! The world only knows seat numbers. Each instance decides locally whether a
//! seat is played by a human at this machine, by the AI, or by a peer whose
//! actions arrive over the network.

mod automated;

pub use automated::{AutomatedPlayer, AutomatedTurnOutcome};

use std::sync::Arc;

use behavior_tree::CancelToken;
use game_core::{PlayerNumber, World};
use tracing::{debug, warn};

use crate::api::SessionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlayerKind {
    Human,
    Automated,
    Remote,
}

/// Controller of one seat.
#[derive(Clone)]
pub enum Player {
    Human,
    Automated(Arc<AutomatedPlayer>),
    Remote,
}

/// What the session should do after handing control to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayOutcome {
    AwaitInput,
    BlockInput,
    /// The seat cannot act (its peer is gone); end the turn on its behalf.
    EndTurnNow,
}

/// Everything a player needs to start its turn.
pub(crate) struct TurnStart {
    pub player: PlayerNumber,
    pub handle: Option<SessionHandle>,
    pub cancel: CancelToken,
    pub is_host: bool,
    pub peer_gone: bool,
}

impl Player {
    pub fn kind(&self) -> PlayerKind {
        match self {
            Player::Human => PlayerKind::Human,
            Player::Automated(_) => PlayerKind::Automated,
            Player::Remote => PlayerKind::Remote,
        }
    }

    pub(crate) fn initialize(&self, number: PlayerNumber, world: &World) {
        debug!(
            target: "runtime::session",
            player = %number,
            kind = %self.kind(),
            units = world.unit_count(number),
            "player initialized"
        );
    }

    pub(crate) fn play(&self, turn: TurnStart) -> PlayOutcome {
        match self {
            Player::Human => PlayOutcome::AwaitInput,
            Player::Automated(ai) => {
                match turn.handle {
                    Some(handle) => {
                        ai.spawn_turn(handle, turn.player, turn.cancel);
                    }
                    None => {
                        warn!(
                            target: "runtime::session",
                            player = %turn.player,
                            "session is shutting down, automated turn not started"
                        );
                    }
                }
                PlayOutcome::BlockInput
            }
            Player::Remote => {
                if turn.is_host && turn.peer_gone {
                    PlayOutcome::EndTurnNow
                } else {
                    PlayOutcome::BlockInput
                }
            }
        }
    }
}
