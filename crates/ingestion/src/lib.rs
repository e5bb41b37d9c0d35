//! # Ingestion
//!
//! The inbound half of the relay: raw JSON objects from sensor bridges are
//! validated and coerced into canonical records (`normalize`), then applied
//! to the store, enqueued for the durable log, and broadcast, in that order.
//! A subscriber observing a broadcast record can immediately read it back as
//! `latest`.

mod coordinator;
mod metrics;
pub mod normalize;

pub use coordinator::{now_ms, IngestCoordinator};
pub use metrics::{IngestMetrics, IngestSnapshot};
pub use normalize::{coerce_finite, normalize};
