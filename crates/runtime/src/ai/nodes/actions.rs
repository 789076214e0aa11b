//! Action nodes for unit trees.
//!
//! Each action enumerates candidates from the context's world copy, picks
//! the best with its scorer, and submits one command. The scorer sits behind
//! a mutex because evaluators are initialized per decision while the tree is
//! shared; the lock is only taken inside the synchronous choice step.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use behavior_tree::{Behavior, Status, TreeContext};
use game_core::{CellCoord, CommandKind, UnitId};
use tracing::debug;

use crate::ai::AiContext;
use crate::ai::scoring::{CellScorer, UnitScorer};

/// Moves to the highest-scoring reachable cell.
///
/// Staying put is always a candidate (scored first); if it wins, the node
/// fails without issuing a command.
pub struct MoveToBestCell {
    scorer: Mutex<CellScorer>,
}

impl MoveToBestCell {
    pub fn new(scorer: CellScorer) -> Self {
        Self {
            scorer: Mutex::new(scorer),
        }
    }

    fn choose(&self, ctx: &AiContext) -> Option<CellCoord> {
        let world = ctx.world();
        let unit = ctx.acting_unit()?;
        let here = unit.cell?;
        if unit.movement_points == 0 {
            return None;
        }

        let candidates = std::iter::once(here).chain(world.reachable_cells(unit));
        let mut scorer = self.scorer.lock().unwrap_or_else(PoisonError::into_inner);
        let best = scorer.best(candidates, unit, world, ctx.debug_mode())?;

        debug!(
            target: "runtime::ai",
            unit = %unit.id,
            from = %here,
            to = %best.candidate,
            score = best.score,
            "best cell"
        );
        (best.candidate != here).then_some(best.candidate)
    }
}

impl Default for MoveToBestCell {
    fn default() -> Self {
        Self::new(CellScorer::default())
    }
}

#[async_trait]
impl Behavior<AiContext> for MoveToBestCell {
    async fn tick(&self, ctx: &mut AiContext) -> Status {
        let Some(destination) = self.choose(ctx) else {
            return Status::Failure;
        };
        let unit = ctx.unit;
        Status::from(ctx.execute(CommandKind::Move { unit, destination }).await)
    }
}

/// Attacks the highest-scoring enemy in range.
pub struct AttackBestTarget {
    scorer: Mutex<UnitScorer>,
}

impl AttackBestTarget {
    pub fn new(scorer: UnitScorer) -> Self {
        Self {
            scorer: Mutex::new(scorer),
        }
    }

    fn choose(&self, ctx: &AiContext) -> Option<UnitId> {
        let world = ctx.world();
        let unit = ctx.acting_unit()?;
        if unit.action_points == 0 {
            return None;
        }

        let candidates: Vec<UnitId> = world.attackable_targets(unit).map(|t| t.id).collect();
        let mut scorer = self.scorer.lock().unwrap_or_else(PoisonError::into_inner);
        let best = scorer.best(candidates, unit, world, ctx.debug_mode())?;

        debug!(
            target: "runtime::ai",
            unit = %unit.id,
            target = %best.candidate,
            score = best.score,
            "best target"
        );
        Some(best.candidate)
    }
}

impl Default for AttackBestTarget {
    fn default() -> Self {
        Self::new(UnitScorer::default())
    }
}

#[async_trait]
impl Behavior<AiContext> for AttackBestTarget {
    async fn tick(&self, ctx: &mut AiContext) -> Status {
        let Some(target) = self.choose(ctx) else {
            return Status::Failure;
        };
        let attacker = ctx.unit;
        Status::from(ctx.execute(CommandKind::Attack { attacker, target }).await)
    }
}
