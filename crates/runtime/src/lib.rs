//! Session runtime for the turn-based grid engine.
//!
//! This crate wires the pure rules from `game-core` into a running session:
//! a worker task that owns the world and the turn loop, the players that act
//! in it, the AI that drives automated seats, and the replay layer that keeps
//! several instances of one session in lockstep. Consumers embed [`Runtime`]
//! and interact with the session through [`SessionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle and error types clients interact with
//! - [`session`] defines phases, interaction modes and snapshots
//! - [`events`] provides the topic-based event bus
//! - [`players`] and [`ai`] decide who acts and how automated seats choose
//! - [`network`] mirrors local actions and replays remote ones
//! - [`workers`] keeps the session task internal to the crate
pub mod ai;
pub mod api;
pub mod config;
pub mod events;
pub mod network;
pub mod players;
pub mod runtime;
pub mod session;

mod workers;

pub use ai::{AiContext, SelectionStrategy, UnitTree};
pub use api::{Result, RuntimeError, SessionError, SessionHandle};
pub use config::{AutomatedConfig, RuntimeConfig};
pub use events::{AbilityEvent, Event, EventBus, SessionEvent, Topic, UnitEvent};
pub use network::{
    CommandReplay, LocalTransport, ReplayItem, ReplayMetrics, ReplayMetricsSnapshot, Transport,
    TransportError,
};
pub use players::{AutomatedPlayer, AutomatedTurnOutcome, Player, PlayerKind};
pub use runtime::{Runtime, RuntimeBuilder};
pub use session::{InteractionState, SessionPhase, SessionSnapshot};
