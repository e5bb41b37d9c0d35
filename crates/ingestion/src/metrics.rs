//! Ingest path counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingest metrics, shared across request handlers
#[derive(Debug, Default)]
pub struct IngestMetrics {
    /// Accepted samples
    pub samples_accepted: AtomicU64,

    /// Accepted events
    pub events_accepted: AtomicU64,

    /// Rejected raw objects
    pub records_rejected: AtomicU64,
}

impl IngestMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted sample
    pub fn record_sample(&self) {
        self.samples_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an accepted event
    pub fn record_event(&self) {
        self.events_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejection
    pub fn record_rejected(&self) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> IngestSnapshot {
        IngestSnapshot {
            samples_accepted: self.samples_accepted.load(Ordering::Relaxed),
            events_accepted: self.events_accepted.load(Ordering::Relaxed),
            records_rejected: self.records_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct IngestSnapshot {
    /// Accepted samples
    pub samples_accepted: u64,

    /// Accepted events
    pub events_accepted: u64,

    /// Rejected raw objects
    pub records_rejected: u64,
}

impl IngestSnapshot {
    /// Total accepted records
    pub fn accepted(&self) -> u64 {
        self.samples_accepted + self.events_accepted
    }
}
