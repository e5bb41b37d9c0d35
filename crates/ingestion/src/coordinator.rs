//! Ingest coordinator - the ordered hot path.
//!
//! normalize -> store -> durable log -> broadcast, per record. The order is
//! the invariant: a subscriber observing a broadcast record can immediately
//! query the store and see that record as `latest`. All three side-effect
//! steps are non-blocking (the log append only enqueues).

use std::sync::Arc;

use chrono::Utc;
use contracts::{Ack, RelayError, SourceId};
use dispatcher::{BroadcastHub, RecordLog};
use observability::{record_record_accepted, record_record_rejected};
use serde_json::Value;
use source_store::RelayStore;
use tracing::{debug, instrument};

use crate::metrics::IngestMetrics;
use crate::normalize::normalize;

/// Current wall clock in milliseconds since epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Orchestrates one accepted record through store, log and hub.
pub struct IngestCoordinator {
    store: Arc<RelayStore>,
    log: Arc<RecordLog>,
    hub: Arc<BroadcastHub>,
    metrics: Arc<IngestMetrics>,
}

impl IngestCoordinator {
    /// Wire the coordinator to its downstream components.
    pub fn new(store: Arc<RelayStore>, log: Arc<RecordLog>, hub: Arc<BroadcastHub>) -> Self {
        Self {
            store,
            log,
            hub,
            metrics: Arc::new(IngestMetrics::new()),
        }
    }

    /// Ingest one raw object for `source`.
    ///
    /// A rejected object has no side effects: nothing is stored, appended or
    /// broadcast. Acceptance applies the record to the store, enqueues the
    /// log append and publishes to all subscribers, in that order.
    #[instrument(name = "ingest", skip(self, raw), fields(source = %source))]
    pub fn ingest(&self, raw: &Value, source: SourceId) -> Result<Ack, RelayError> {
        let record = match normalize(raw, source, now_ms()) {
            Ok(record) => record,
            Err(e) => {
                self.metrics.record_rejected();
                record_record_rejected(source.get());
                debug!(source = %source, reason = %e, "Record rejected");
                return Err(e);
            }
        };

        match &record {
            contracts::Record::Sample(_) => self.metrics.record_sample(),
            contracts::Record::Event(_) => self.metrics.record_event(),
        }
        record_record_accepted(source.get(), record.kind_str());

        self.store.apply(record.clone());
        self.log.append(&record);
        self.hub.publish(&record);

        debug!(source = %source, kind = record.kind_str(), ts = record.ts(), "Record ingested");
        Ok(Ack::accepted())
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<RelayStore> {
        &self.store
    }

    /// Shared hub handle.
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Shared log handle.
    pub fn log(&self) -> &Arc<RecordLog> {
        &self.log
    }

    /// Ingest metrics handle.
    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        &self.metrics
    }
}
