//! Inbound replay queue and the network tasks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use game_core::{Command, CommandRegistry, Origin, PlayerNumber, WireMessage, WirePayload};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::metrics::ReplayMetrics;
use super::transport::Transport;
use crate::api::{Result, SessionHandle};

/// One decoded remote action waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayItem {
    Ability(Command),
    TurnEnded { player: PlayerNumber, turn: u32 },
}

impl ReplayItem {
    fn label(&self) -> &'static str {
        match self {
            ReplayItem::Ability(command) => command.kind.tag(),
            ReplayItem::TurnEnded { .. } => "turn_ended",
        }
    }
}

impl From<WireMessage> for ReplayItem {
    fn from(message: WireMessage) -> Self {
        match message {
            WireMessage::Ability(kind) => ReplayItem::Ability(Command::network(kind)),
            WireMessage::TurnEnded { player, turn } => ReplayItem::TurnEnded { player, turn },
        }
    }
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<ReplayItem>,
    draining: bool,
}

/// FIFO of remote actions plus the single-flight drain flag.
///
/// The lock is never held across an await.
#[derive(Clone, Default)]
struct ReplayQueue {
    state: Arc<Mutex<QueueState>>,
}

impl ReplayQueue {
    /// Queues `item`. Returns the new depth and whether the caller must start
    /// a drain loop.
    fn push(&self, item: ReplayItem) -> (usize, bool) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.items.push_back(item);
        let start = !state.draining;
        state.draining = true;
        (state.items.len(), start)
    }

    /// Next item, or `None` after releasing the drain flag.
    fn pop(&self) -> Option<ReplayItem> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let item = state.items.pop_front();
        if item.is_none() {
            state.draining = false;
        }
        item
    }

    fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .len()
    }
}

/// Applies remote actions to the local session in arrival order.
///
/// Arrivals while a drain loop is running are picked up by that loop; a
/// second loop is never started.
#[derive(Clone)]
pub struct CommandReplay {
    handle: SessionHandle,
    registry: Arc<CommandRegistry>,
    queue: ReplayQueue,
    metrics: Arc<ReplayMetrics>,
}

impl CommandReplay {
    pub fn new(
        handle: SessionHandle,
        registry: Arc<CommandRegistry>,
        metrics: Arc<ReplayMetrics>,
    ) -> Self {
        Self {
            handle,
            registry,
            queue: ReplayQueue::default(),
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<ReplayMetrics> {
        &self.metrics
    }

    /// Items received but not yet applied.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Decodes a payload from a peer and queues it. Undecodable payloads are
    /// logged and dropped.
    pub fn receive_payload(&self, payload: &WirePayload) {
        match self.registry.decode(payload) {
            Ok(message) => self.enqueue(message.into()),
            Err(error) => {
                self.metrics.record_dropped();
                warn!(
                    target: "runtime::replay",
                    op_code = %payload.op_code,
                    %error,
                    "dropping undecodable payload"
                );
            }
        }
    }

    pub fn enqueue(&self, item: ReplayItem) {
        let (depth, start) = self.queue.push(item);
        self.metrics.record_received(depth as u64);
        if start {
            self.metrics.record_drain_started();
            debug!(target: "runtime::replay", depth, "drain loop started");
            let replay = self.clone();
            tokio::spawn(async move { replay.drain().await });
        }
    }

    async fn drain(self) {
        let mut applied = 0usize;
        while let Some(item) = self.queue.pop() {
            let label = item.label();
            match self.apply(item).await {
                Ok(()) => {
                    applied += 1;
                    self.metrics.record_applied();
                }
                Err(error) => {
                    self.metrics.record_dropped();
                    warn!(target: "runtime::replay", item = label, %error, "remote action rejected");
                }
            }
        }
        debug!(target: "runtime::replay", applied, "drain loop finished");
    }

    async fn apply(&self, item: ReplayItem) -> Result<()> {
        match item {
            ReplayItem::Ability(command) => {
                debug_assert_eq!(command.origin, Origin::Network);
                self.handle.execute_command(command).await?;
            }
            ReplayItem::TurnEnded { player, turn } => {
                debug!(target: "runtime::replay", %player, turn, "replaying turn end");
                self.handle.end_turn_at(player, turn, Origin::Network).await?;
            }
        }
        Ok(())
    }
}

/// Broadcasts every message the session mirrors.
pub(crate) fn spawn_outbound(
    transport: Arc<dyn Transport>,
    mut outbound_rx: mpsc::UnboundedReceiver<WireMessage>,
    metrics: Arc<ReplayMetrics>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let payload = message.encode();
            match transport.send(&payload).await {
                Ok(()) => metrics.record_broadcast(),
                Err(error) => {
                    warn!(target: "runtime::replay", op_code = %payload.op_code, %error, "broadcast failed")
                }
            }
        }
        debug!(target: "runtime::replay", "outbound mirror closed");
    })
}

/// Feeds every payload the transport delivers into `replay`.
pub(crate) fn spawn_inbound(transport: Arc<dyn Transport>, replay: CommandReplay) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(received) = transport.receive().await {
            match received {
                Ok(payload) => replay.receive_payload(&payload),
                Err(error) => {
                    replay.metrics.record_dropped();
                    warn!(target: "runtime::replay", %error, "dropping malformed frame");
                }
            }
        }
        info!(target: "runtime::replay", "transport closed");
    })
}
