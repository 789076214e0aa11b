//! Blackboard handed to a unit tree.

use behavior_tree::{CancelToken, TreeContext};
use game_core::{Command, CommandKind, PlayerNumber, Unit, UnitId, World};
use tracing::{debug, warn};

use crate::api::SessionHandle;

/// Context for one unit's decision.
///
/// Holds a private copy of the world that is refreshed after every accepted
/// command, so scoring always sees the board the session actually has.
pub struct AiContext {
    pub player: PlayerNumber,
    pub unit: UnitId,
    world: World,
    handle: SessionHandle,
    cancel: CancelToken,
    debug: bool,
}

impl AiContext {
    pub fn new(
        player: PlayerNumber,
        unit: UnitId,
        world: World,
        handle: SessionHandle,
        cancel: CancelToken,
        debug: bool,
    ) -> Self {
        Self {
            player,
            unit,
            world,
            handle,
            cancel,
            debug,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The deciding unit, if it is still alive.
    pub fn acting_unit(&self) -> Option<&Unit> {
        self.world.unit(self.unit)
    }

    /// Submits `kind` as a local command and refreshes the world on success.
    ///
    /// Returns whether the session accepted the command.
    pub async fn execute(&mut self, kind: CommandKind) -> bool {
        match self.handle.execute_command(Command::local(kind)).await {
            Ok(outcome) => {
                debug!(
                    target: "runtime::ai",
                    player = %self.player,
                    unit = %self.unit,
                    command = kind.tag(),
                    changes = outcome.changes.len(),
                    "command accepted"
                );
                self.refresh().await;
                true
            }
            Err(error) => {
                debug!(
                    target: "runtime::ai",
                    player = %self.player,
                    unit = %self.unit,
                    command = kind.tag(),
                    %error,
                    "command rejected"
                );
                false
            }
        }
    }

    /// Replaces the local world copy with the session's current one.
    pub async fn refresh(&mut self) -> bool {
        match self.handle.snapshot().await {
            Ok(snapshot) => {
                self.world = snapshot.world;
                true
            }
            Err(error) => {
                warn!(target: "runtime::ai", %error, "failed to refresh world");
                false
            }
        }
    }
}

impl TreeContext for AiContext {
    fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn debug_mode(&self) -> bool {
        self.debug
    }
}
