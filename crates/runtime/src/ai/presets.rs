//! Ready-made unit trees.
//!
//! ```text
//! skirmisher()
//!   └─ Sequence
//!       ├─ AlwaysSucceed(attack)        ← strike first if something is in reach
//!       ├─ AlwaysSucceed(Sequence)
//!       │   ├─ MoveToBestCell
//!       │   └─ Delay(move_delay)
//!       └─ AlwaysSucceed(attack)        ← strike after closing in
//!
//! attack = Sequence[HasActionPoints, EnemyInRange, AttackBestTarget]
//! ```

use std::sync::Arc;
use std::time::Duration;

use behavior_tree::builder::{always_succeed, delay, sequence};
use behavior_tree::{Behavior, Sequence};

use super::AiContext;
use super::nodes::{AttackBestTarget, EnemyInRange, HasActionPoints, HasMovementPoints, MoveToBestCell};

/// A tree shared by every unit of one automated player.
pub type UnitTree = Arc<dyn Behavior<AiContext>>;

type Node = Box<dyn Behavior<AiContext>>;

fn attack() -> Node {
    sequence(vec![
        Box::new(HasActionPoints),
        Box::new(EnemyInRange),
        Box::new(AttackBestTarget::default()),
    ])
}

fn advance(move_delay: Duration) -> Node {
    sequence(vec![
        Box::new(HasMovementPoints),
        Box::new(MoveToBestCell::default()),
        delay(move_delay),
    ])
}

/// Attack, move to the best cell, attack again. Every step is optional.
pub fn skirmisher(move_delay: Duration) -> UnitTree {
    Arc::new(Sequence::new(vec![
        always_succeed(attack()),
        always_succeed(advance(move_delay)),
        always_succeed(attack()),
    ]))
}
