//! Turn order.
//!
//! A [`TurnResolver`] maps the current board plus the previous
//! [`TurnContext`] to the next one without touching the world.

mod context;
mod resolver;

pub use context::{PlayableUnits, TurnContext};
pub use resolver::{SubsequentTurnResolver, TurnError, TurnResolver};
