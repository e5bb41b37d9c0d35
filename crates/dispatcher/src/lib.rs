//! # Dispatcher
//!
//! The fan-out side of the relay:
//! - `RecordLog` appends every accepted record to a per-source
//!   newline-delimited-JSON file, off the acknowledgment path
//! - `BroadcastHub` pushes every accepted record to all live subscribers,
//!   with a latest-snapshot catch-up burst on subscribe
//!
//! Slow or failing outputs are isolated: a full append queue drops the line,
//! a closed subscriber channel removes only that subscriber.

pub mod appender;
pub mod handle;
pub mod hub;
pub mod metrics;
pub mod sinks;

pub use appender::RecordLog;
pub use contracts::{Record, RecordSink};
pub use handle::SinkHandle;
pub use hub::{BroadcastHub, SubscriberId, Subscription};
pub use metrics::{HubMetrics, HubSnapshot, MetricsSnapshot, SinkMetrics};
pub use sinks::{JsonlSink, LogSink};
