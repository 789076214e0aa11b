//! Replay counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by [`super::CommandReplay`] and the outbound task.
///
/// Uses atomics for lock-free access across tasks.
#[derive(Debug, Default)]
pub struct ReplayMetrics {
    /// Local actions handed to the transport
    broadcasts: AtomicU64,

    /// Remote actions decoded and queued
    received: AtomicU64,

    /// Queued actions accepted by the session
    applied: AtomicU64,

    /// Payloads that failed to decode or were rejected by the session
    dropped: AtomicU64,

    /// Drain loops spawned; one per burst of arrivals
    drain_loops_started: AtomicU64,

    /// Deepest the inbound queue has been
    peak_queue_depth: AtomicU64,
}

impl ReplayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_received(&self, queue_depth: u64) {
        self.received.fetch_add(1, Ordering::Relaxed);
        self.peak_queue_depth.fetch_max(queue_depth, Ordering::Relaxed);
    }

    pub(crate) fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drain_started(&self) {
        self.drain_loops_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn broadcasts(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn drain_loops_started(&self) -> u64 {
        self.drain_loops_started.load(Ordering::Relaxed)
    }

    pub fn peak_queue_depth(&self) -> u64 {
        self.peak_queue_depth.load(Ordering::Relaxed)
    }

    /// Returns a consistent-enough copy for logging.
    pub fn snapshot(&self) -> ReplayMetricsSnapshot {
        ReplayMetricsSnapshot {
            broadcasts: self.broadcasts(),
            received: self.received(),
            applied: self.applied(),
            dropped: self.dropped(),
            drain_loops_started: self.drain_loops_started(),
            peak_queue_depth: self.peak_queue_depth(),
        }
    }
}

/// Point-in-time copy of [`ReplayMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplayMetricsSnapshot {
    pub broadcasts: u64,
    pub received: u64,
    pub applied: u64,
    pub dropped: u64,
    pub drain_loops_started: u64,
    pub peak_queue_depth: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_peak_queue_depth() {
        let metrics = ReplayMetrics::new();
        metrics.record_received(1);
        metrics.record_received(3);
        metrics.record_received(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.received, 3);
        assert_eq!(snapshot.peak_queue_depth, 3);
    }
}
