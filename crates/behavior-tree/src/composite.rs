//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides the fundamental building blocks for creating complex
//! decision trees: [`Sequence`] (AND logic) and [`Selector`] (OR logic).

use async_trait::async_trait;

use crate::{Behavior, Status, TreeContext};

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
/// - If the context is cancelled before a child starts, the sequence returns `Failure`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<C: TreeContext> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C: TreeContext> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A sequence with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self { children }
    }
}

#[async_trait]
impl<C: TreeContext> Behavior<C> for Sequence<C> {
    async fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if ctx.cancel_token().is_cancelled() {
                return Status::Failure;
            }
            if child.tick(ctx).await.is_failure() {
                return Status::Failure; // Short-circuit
            }
        }
        // All children succeeded
        Status::Success
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
/// - If the context is cancelled before a child starts, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<C: TreeContext> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C: TreeContext> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A selector with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self { children }
    }
}

#[async_trait]
impl<C: TreeContext> Behavior<C> for Selector<C> {
    async fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if ctx.cancel_token().is_cancelled() {
                return Status::Failure;
            }
            if child.tick(ctx).await.is_success() {
                return Status::Success; // Short-circuit
            }
        }
        // All children failed
        Status::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CancelToken;

    #[derive(Default)]
    struct TestContext {
        value: i32,
        ticks: usize,
        cancel: CancelToken,
    }

    impl TreeContext for TestContext {
        fn cancel_token(&self) -> &CancelToken {
            &self.cancel
        }
    }

    struct Increment;
    #[async_trait]
    impl Behavior<TestContext> for Increment {
        async fn tick(&self, ctx: &mut TestContext) -> Status {
            ctx.ticks += 1;
            ctx.value += 1;
            Status::Success
        }
    }

    struct FailAlways;
    #[async_trait]
    impl Behavior<TestContext> for FailAlways {
        async fn tick(&self, ctx: &mut TestContext) -> Status {
            ctx.ticks += 1;
            Status::Failure
        }
    }

    /// Succeeds, then cancels the context it runs in.
    struct CancelAfter;
    #[async_trait]
    impl Behavior<TestContext> for CancelAfter {
        async fn tick(&self, ctx: &mut TestContext) -> Status {
            ctx.ticks += 1;
            ctx.cancel.cancel();
            Status::Success
        }
    }

    #[tokio::test]
    async fn sequence_all_success() {
        let seq = Sequence::new(vec![Box::new(Increment), Box::new(Increment)]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx).await, Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[tokio::test]
    async fn sequence_stops_after_second_child_fails() {
        let seq = Sequence::new(vec![
            Box::new(Increment),
            Box::new(FailAlways),
            Box::new(Increment), // Should not execute
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx).await, Status::Failure);
        assert_eq!(ctx.ticks, 2);
        assert_eq!(ctx.value, 1);
    }

    #[tokio::test]
    async fn selector_succeeds_on_third_child() {
        let sel = Selector::new(vec![
            Box::new(FailAlways),
            Box::new(FailAlways),
            Box::new(Increment),
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx).await, Status::Success);
        assert_eq!(ctx.ticks, 3);
    }

    #[tokio::test]
    async fn selector_short_circuits_on_first_success() {
        let sel = Selector::new(vec![
            Box::new(FailAlways),
            Box::new(Increment),
            Box::new(Increment), // Should not execute
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx).await, Status::Success);
        assert_eq!(ctx.value, 1);
    }

    #[tokio::test]
    async fn selector_fails_when_all_fail() {
        let sel = Selector::new(vec![Box::new(FailAlways), Box::new(FailAlways)]);

        let mut ctx = TestContext::default();
        assert_eq!(sel.tick(&mut ctx).await, Status::Failure);
        assert_eq!(ctx.ticks, 2);
    }

    #[tokio::test]
    async fn cancelled_sequence_starts_no_new_child() {
        let seq = Sequence::new(vec![
            Box::new(Increment),
            Box::new(CancelAfter),
            Box::new(Increment),
        ]);

        let mut ctx = TestContext::default();
        assert_eq!(seq.tick(&mut ctx).await, Status::Failure);
        // The running leaf finished, the next one never started.
        assert_eq!(ctx.ticks, 2);
        assert_eq!(ctx.value, 1);
    }

    #[tokio::test]
    async fn cancelled_selector_fails_without_ticking() {
        let sel = Selector::new(vec![Box::new(Increment)]);

        let mut ctx = TestContext::default();
        ctx.cancel.cancel();
        assert_eq!(sel.tick(&mut ctx).await, Status::Failure);
        assert_eq!(ctx.ticks, 0);
    }
}
