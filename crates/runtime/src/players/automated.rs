//! AI-controlled seats.

use std::sync::Arc;

use behavior_tree::{Behavior, CancelToken};
use game_core::{Origin, PlayerNumber, UnitMark};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ai::{AiContext, SelectionStrategy, UnitTree};
use crate::api::{Result, RuntimeError, SessionError, SessionHandle};
use crate::config::AutomatedConfig;

/// How an automated turn finished.
#[derive(Debug)]
pub enum AutomatedTurnOutcome {
    /// Every unit acted and the turn was ended.
    Completed { units: usize },
    /// The turn or the game ended first. Not an error.
    Cancelled,
    /// The session could not be reached.
    Failed(RuntimeError),
}

/// Drives one seat: orders its units, runs the unit tree for each, then ends
/// the turn.
pub struct AutomatedPlayer {
    tree: UnitTree,
    strategy: SelectionStrategy,
    config: AutomatedConfig,
    debug_gate: Arc<Notify>,
}

impl AutomatedPlayer {
    pub fn new(tree: UnitTree, strategy: SelectionStrategy, config: AutomatedConfig) -> Self {
        Self {
            tree,
            strategy,
            config,
            debug_gate: Arc::new(Notify::new()),
        }
    }

    /// Shares the step signal used in debug mode.
    pub fn with_debug_gate(mut self, gate: Arc<Notify>) -> Self {
        self.debug_gate = gate;
        self
    }

    pub(crate) fn spawn_turn(
        self: &Arc<Self>,
        handle: SessionHandle,
        player: PlayerNumber,
        cancel: CancelToken,
    ) -> JoinHandle<AutomatedTurnOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = this.play_turn(handle, player, cancel).await;
            match &outcome {
                AutomatedTurnOutcome::Completed { units } => {
                    info!(target: "runtime::ai", %player, units, "automated turn completed")
                }
                AutomatedTurnOutcome::Cancelled => {
                    info!(target: "runtime::ai", %player, "automated turn cancelled")
                }
                AutomatedTurnOutcome::Failed(error) => {
                    warn!(target: "runtime::ai", %player, %error, "automated turn failed")
                }
            }
            outcome
        })
    }

    /// Plays one turn for `player`.
    ///
    /// `cancel` is raised by the session when the turn or the game ends; the
    /// turn then stops before the next unit, and a running tree finishes its
    /// current leaf and starts no new one.
    pub async fn play_turn(
        &self,
        handle: SessionHandle,
        player: PlayerNumber,
        cancel: CancelToken,
    ) -> AutomatedTurnOutcome {
        match self.run(&handle, player, &cancel).await {
            Ok(Some(units)) => AutomatedTurnOutcome::Completed { units },
            Ok(None) => AutomatedTurnOutcome::Cancelled,
            // Lost a race with the end of the turn or the game.
            Err(RuntimeError::Session(
                SessionError::GameEnded | SessionError::NotCurrentPlayer { .. },
            )) => AutomatedTurnOutcome::Cancelled,
            Err(error) if cancel.is_cancelled() => {
                debug!(target: "runtime::ai", %player, %error, "error after cancellation");
                AutomatedTurnOutcome::Cancelled
            }
            Err(error) => AutomatedTurnOutcome::Failed(error),
        }
    }

    /// `Ok(None)` means cancelled.
    async fn run(
        &self,
        handle: &SessionHandle,
        player: PlayerNumber,
        cancel: &CancelToken,
    ) -> Result<Option<usize>> {
        if !cancel.sleep(self.config.turn_start_delay).await {
            return Ok(None);
        }

        let snapshot = handle.snapshot().await?;
        if snapshot.current_player() != Some(player) {
            return Ok(None);
        }
        let units = self
            .strategy
            .order(snapshot.playable_units(), &snapshot.world);
        debug!(target: "runtime::ai", %player, units = units.len(), strategy = %self.strategy, "turn started");

        let mut acted = 0;
        for unit in units {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            if let Err(error) = handle.mark_unit(unit, UnitMark::Selected).await {
                debug!(target: "runtime::ai", %unit, %error, "unit no longer selectable");
                continue;
            }

            if self.config.debug_mode {
                debug!(target: "runtime::ai", %unit, "waiting for debug step");
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(None),
                    _ = self.debug_gate.notified() => {}
                }
            }
            if !cancel.sleep(self.config.unit_delay).await {
                return Ok(None);
            }

            let world = handle.snapshot().await?.world;
            if !world.contains_unit(unit) {
                continue;
            }
            let mut ctx = AiContext::new(
                player,
                unit,
                world,
                handle.clone(),
                cancel.clone(),
                self.config.debug_mode,
            );
            let status = self.tree.tick(&mut ctx).await;
            debug!(target: "runtime::ai", %unit, ?status, "unit tree finished");

            if cancel.is_cancelled() {
                return Ok(None);
            }
            if ctx.world().contains_unit(unit) {
                handle.mark_unit(unit, UnitMark::Finished).await?;
            }
            acted += 1;
        }

        if cancel.is_cancelled() {
            return Ok(None);
        }
        handle.end_turn_for(player, Origin::Local).await?;
        Ok(Some(acted))
    }
}
