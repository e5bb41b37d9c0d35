//! Relay run statistics.

use std::time::Duration;

use dispatcher::HubSnapshot;
use ingestion::IngestSnapshot;

/// Statistics from a relay run, gathered at shutdown
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Ingest path counters
    pub ingest: IngestSnapshot,

    /// Broadcast hub counters
    pub hub: HubSnapshot,

    /// Sources that produced at least one record
    pub active_sources: usize,

    /// Records dropped from the durable log (full queue)
    pub log_dropped: u64,

    /// Durable log write failures
    pub log_failures: u64,

    /// Total duration of the run
    pub duration: Duration,
}

impl RelayStats {
    /// Records accepted per second over the run
    pub fn rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.ingest.accepted() as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Relay Statistics ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Samples accepted: {}", self.ingest.samples_accepted);
        println!("   ├─ Events accepted: {}", self.ingest.events_accepted);
        println!("   ├─ Records rejected: {}", self.ingest.records_rejected);
        println!("   ├─ Rate: {:.2} records/s", self.rate());
        println!("   └─ Active sources: {}", self.active_sources);

        println!("\nBroadcast");
        println!("   ├─ Records published: {}", self.hub.published_count);
        println!("   ├─ Catch-up records: {}", self.hub.catch_up_count);
        println!(
            "   ├─ Subscribers at shutdown: {}",
            self.hub.subscriber_count
        );
        println!("   └─ Subscribers dropped: {}", self.hub.removed_count);

        println!("\nDurable log");
        println!("   ├─ Lines dropped: {}", self.log_dropped);
        println!("   └─ Write failures: {}", self.log_failures);

        println!();
    }
}
