//! Sink and hub metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single sink worker
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total write failures
    failure_count: AtomicU64,
    /// Total records dropped due to full queue
    dropped_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set current queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Get total write count
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Increment write count
    pub fn inc_write_count(&self) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub write_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
}

/// Metrics for the broadcast hub
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Currently connected subscribers
    subscriber_count: AtomicUsize,
    /// Total records published
    published_count: AtomicU64,
    /// Subscribers removed after a failed send
    removed_count: AtomicU64,
    /// Catch-up records delivered to new subscribers
    catch_up_count: AtomicU64,
}

impl HubMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::Relaxed)
    }

    /// Set current subscriber count
    pub fn set_subscriber_count(&self, count: usize) {
        self.subscriber_count.store(count, Ordering::Relaxed);
    }

    /// Get published record count
    pub fn published_count(&self) -> u64 {
        self.published_count.load(Ordering::Relaxed)
    }

    /// Increment published record count
    pub fn inc_published_count(&self) {
        self.published_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get removed subscriber count
    pub fn removed_count(&self) -> u64 {
        self.removed_count.load(Ordering::Relaxed)
    }

    /// Record subscribers removed after failed sends
    pub fn add_removed(&self, count: u64) {
        self.removed_count.fetch_add(count, Ordering::Relaxed);
    }

    /// Get catch-up record count
    pub fn catch_up_count(&self) -> u64 {
        self.catch_up_count.load(Ordering::Relaxed)
    }

    /// Record catch-up records delivered
    pub fn add_catch_up(&self, count: u64) {
        self.catch_up_count.fetch_add(count, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            subscriber_count: self.subscriber_count(),
            published_count: self.published_count(),
            removed_count: self.removed_count(),
            catch_up_count: self.catch_up_count(),
        }
    }
}

/// Snapshot of hub metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct HubSnapshot {
    pub subscriber_count: usize,
    pub published_count: u64,
    pub removed_count: u64,
    pub catch_up_count: u64,
}
