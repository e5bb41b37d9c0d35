//! Relay metrics helpers over the `metrics` facade.
//!
//! Called from the ingest hot path and the fan-out side; labels keep
//! per-source and per-kind cardinality low (source ids are small integers).

use metrics::{counter, gauge};

/// Record an accepted record.
pub fn record_record_accepted(source: u16, kind: &'static str) {
    counter!(
        "posture_relay_records_accepted_total",
        "source" => source.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record a rejected raw object.
pub fn record_record_rejected(source: u16) {
    counter!(
        "posture_relay_records_rejected_total",
        "source" => source.to_string()
    )
    .increment(1);
}

/// Record a broadcast fan-out and the subscriber count it reached.
pub fn record_broadcast(subscribers: usize) {
    counter!("posture_relay_broadcasts_total").increment(1);
    gauge!("posture_relay_subscribers").set(subscribers as f64);
}

/// Record the current subscriber count.
pub fn record_subscriber_count(subscribers: usize) {
    gauge!("posture_relay_subscribers").set(subscribers as f64);
}

/// Record a durable log append failure.
pub fn record_append_failure(source: u16) {
    counter!(
        "posture_relay_append_failures_total",
        "source" => source.to_string()
    )
    .increment(1);
}

/// Record a log line dropped because the append queue was full.
pub fn record_append_dropped(source: u16) {
    counter!(
        "posture_relay_append_dropped_total",
        "source" => source.to_string()
    )
    .increment(1);
}
