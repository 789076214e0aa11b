//! Topic-based event bus for session events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Dropping a receiver unsubscribes it.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{AbilityEvent, SessionEvent, UnitEvent};
