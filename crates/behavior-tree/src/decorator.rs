//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or execution.
//! This module provides [`Inverter`] (NOT logic), [`AlwaysSucceed`] (error
//! suppression) and [`Delay`] (a cancellable pause).

use std::time::Duration;

use async_trait::async_trait;

use crate::{Behavior, Status, TreeContext};

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<C: TreeContext> {
    child: Box<dyn Behavior<C>>,
}

impl<C: TreeContext> Inverter<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

#[async_trait]
impl<C: TreeContext> Behavior<C> for Inverter<C> {
    async fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).await.invert()
    }
}

/// Always returns `Success`, regardless of the child's result.
///
/// # Semantics
///
/// - If the child returns `Success`, returns `Success`
/// - If the child returns `Failure`, **still returns `Success`**
///
/// This is useful for:
/// - Best-effort actions that shouldn't cause a sequence to fail
///   (attack if anything is in range, then move anyway)
/// - Logging/debugging nodes that observe state without affecting control flow
pub struct AlwaysSucceed<C: TreeContext> {
    child: Box<dyn Behavior<C>>,
}

impl<C: TreeContext> AlwaysSucceed<C> {
    /// Creates a new always-succeed wrapper around the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

#[async_trait]
impl<C: TreeContext> Behavior<C> for AlwaysSucceed<C> {
    async fn tick(&self, ctx: &mut C) -> Status {
        // Execute child but ignore the result
        let _ = self.child.tick(ctx).await;
        Status::Success
    }
}

/// Suspends for a fixed duration, then succeeds.
///
/// Used to pace automated players (e.g. let a move animation play out before
/// the next decision). The wait is raced against the context's cancel token;
/// a cancelled delay returns `Failure` so enclosing sequences stop.
#[derive(Debug, Clone, Copy)]
pub struct Delay {
    duration: Duration,
}

impl Delay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[async_trait]
impl<C: TreeContext> Behavior<C> for Delay {
    async fn tick(&self, ctx: &mut C) -> Status {
        let token = ctx.cancel_token().clone();
        Status::from(token.sleep(self.duration).await)
    }
}
