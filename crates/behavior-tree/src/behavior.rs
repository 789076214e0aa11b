//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for all behavior tree nodes. The trait is generic over a
//! context type `C`, allowing nodes to access game state and make decisions.

use async_trait::async_trait;

use crate::{CancelToken, Status};

/// Blackboard requirements shared by every node.
///
/// Composites consult the token before starting each child and [`Delay`]
/// races its timer against it, so a cancelled tree stops at the next node
/// boundary.
///
/// [`Delay`]: crate::Delay
pub trait TreeContext: Send + 'static {
    /// Token observed at every suspension point of the tree.
    fn cancel_token(&self) -> &CancelToken;

    /// Whether nodes should emit their full decision traces.
    fn debug_mode(&self) -> bool {
        false
    }
}

/// A behavior tree node that can be evaluated against a context.
#[async_trait]
pub trait Behavior<C: TreeContext>: Send + Sync {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context/blackboard. Nodes can read
    ///   game state and modify it (e.g., to refresh a snapshot after acting).
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed or was cancelled
    async fn tick(&self, ctx: &mut C) -> Status;
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
#[async_trait]
impl<C: TreeContext> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    async fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx).await
    }
}
