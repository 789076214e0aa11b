//! Command replay between session instances.
//!
//! Every instance runs its own session. Locally authored abilities and turn
//! ends are mirrored to peers over a [`Transport`]; payloads received from
//! peers are decoded and applied to the local session in arrival order with
//! [`game_core::Origin::Network`], which keeps them from being mirrored back.
//!
//! # Module Structure
//!
//! - `transport`: the peer link abstraction and an in-memory implementation
//! - `replay`: inbound queue, single-flight drain and the network tasks
//! - `metrics`: counters for broadcasts, replays and drain loops

mod metrics;
mod replay;
mod transport;

pub use metrics::{ReplayMetrics, ReplayMetricsSnapshot};
pub use replay::{CommandReplay, ReplayItem};
pub use transport::{LocalTransport, Transport, TransportError};

pub(crate) use replay::{spawn_inbound, spawn_outbound};
