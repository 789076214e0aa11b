//! Condition nodes for unit trees.

use async_trait::async_trait;
use behavior_tree::{Behavior, Status};

use crate::ai::AiContext;

/// Succeeds while the unit can still move this turn.
pub struct HasMovementPoints;

#[async_trait]
impl Behavior<AiContext> for HasMovementPoints {
    async fn tick(&self, ctx: &mut AiContext) -> Status {
        Status::from(ctx.acting_unit().is_some_and(|u| u.movement_points > 0))
    }
}

/// Succeeds while the unit can still attack this turn.
pub struct HasActionPoints;

#[async_trait]
impl Behavior<AiContext> for HasActionPoints {
    async fn tick(&self, ctx: &mut AiContext) -> Status {
        Status::from(ctx.acting_unit().is_some_and(|u| u.action_points > 0))
    }
}

/// Succeeds when at least one enemy is attackable from the unit's cell.
pub struct EnemyInRange;

#[async_trait]
impl Behavior<AiContext> for EnemyInRange {
    async fn tick(&self, ctx: &mut AiContext) -> Status {
        let world = ctx.world();
        Status::from(
            ctx.acting_unit()
                .is_some_and(|unit| world.attackable_targets(unit).next().is_some()),
        )
    }
}
