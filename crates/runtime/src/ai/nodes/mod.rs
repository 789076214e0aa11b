//! Leaf nodes for unit trees.
//!
//! Conditions read the context's world copy and never submit commands;
//! actions score candidates and submit at most one command per tick.

mod actions;
mod conditions;

pub use actions::{AttackBestTarget, MoveToBestCell};
pub use conditions::{EnemyInRange, HasActionPoints, HasMovementPoints};
