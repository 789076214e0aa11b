//! Cancellable behavior tree library for turn-based games.
//!
//! Trees are evaluated cooperatively: a tick is an async call that may
//! suspend (for a [`Delay`] or inside a leaf waiting on the game), and every
//! suspension point observes the context's [`CancelToken`].
//!
//! - **Two outcomes**: nodes report [`Status::Success`] or [`Status::Failure`];
//!   long-running work is expressed by awaiting inside `tick`, not by a
//!   `Running` status
//! - **Leaf granularity**: once cancelled, composites start no new child; a
//!   leaf that is already running finishes
//! - **Shared, immutable trees**: nodes take `&self`, so one tree can be built
//!   per player and reused every turn
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`TreeContext`]: What a node may ask of its blackboard
//! - [`Status`]: Success or Failure
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`], [`AlwaysSucceed`], [`Delay`]

pub mod behavior;
pub mod builder;
pub mod cancel;
pub mod composite;
pub mod decorator;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::{Behavior, TreeContext};
pub use cancel::CancelToken;
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Delay, Inverter};
pub use status::Status;
