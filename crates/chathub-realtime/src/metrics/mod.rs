//! Hub metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Hub-level counters.
#[derive(Debug)]
pub struct HubMetrics {
    /// Total subscribers ever registered
    pub connections_total: AtomicU64,
    /// Subscribers currently registered
    pub connections_active: AtomicU64,
    /// Messages that passed the limiter and were fanned out
    pub messages_published: AtomicU64,
    /// Per-subscriber enqueues across all fan-outs
    pub messages_enqueued: AtomicU64,
    /// Subscribers evicted for a full queue
    pub evictions: AtomicU64,
    /// Publishes aborted while waiting on the limiter
    pub publish_cancellations: AtomicU64,
}

impl HubMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            connections_active: AtomicU64::new(0),
            messages_published: AtomicU64::new(0),
            messages_enqueued: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            publish_cancellations: AtomicU64::new(0),
        }
    }

    /// Record a registration
    pub fn record_connect(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an unregistration
    pub fn record_disconnect(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record one fan-out and how many queues accepted it
    pub fn record_publish(&self, enqueued: u64) {
        self.messages_published.fetch_add(1, Ordering::Relaxed);
        self.messages_enqueued.fetch_add(enqueued, Ordering::Relaxed);
    }

    /// Record a slow-consumer eviction
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a publish aborted by cancellation
    pub fn record_publish_cancelled(&self) {
        self.publish_cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_published: self.messages_published.load(Ordering::Relaxed),
            messages_enqueued: self.messages_enqueued.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            publish_cancellations: self.publish_cancellations.load(Ordering::Relaxed),
        }
    }
}

impl Default for HubMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total subscribers ever registered
    pub connections_total: u64,
    /// Subscribers currently registered
    pub connections_active: u64,
    /// Messages fanned out
    pub messages_published: u64,
    /// Per-subscriber enqueues
    pub messages_enqueued: u64,
    /// Slow-consumer evictions
    pub evictions: u64,
    /// Publishes aborted while rate limited
    pub publish_cancellations: u64,
}
