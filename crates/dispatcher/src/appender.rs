//! RecordLog - durable per-source append log, off the acknowledgment path.
//!
//! One `JsonlSink` worker per source file, created lazily on the first record
//! for that source. `append` only enqueues; the worker owns the file handle,
//! so per-source line order equals enqueue order and a disk stall never
//! blocks ingest.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use contracts::{LogConfig, Record, RelayError, SourceId};
use tracing::{error, info, instrument, warn};

use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{JsonlSink, LogSink};

/// Durable append-only log over per-source jsonl files.
pub struct RecordLog {
    dir: PathBuf,
    queue_capacity: usize,
    handles: Mutex<BTreeMap<SourceId, SinkHandle>>,
    summary: Mutex<Option<SinkHandle>>,
}

impl RecordLog {
    /// Create the log, ensuring the directory exists.
    ///
    /// An uncreatable directory is a fatal configuration problem and is
    /// surfaced to the caller, unlike later per-record write failures.
    pub fn new(config: &LogConfig) -> Result<Self, RelayError> {
        fs::create_dir_all(&config.dir).map_err(|e| {
            RelayError::config_validation(
                "log.dir",
                format!("cannot create '{}': {e}", config.dir.display()),
            )
        })?;

        let summary = config
            .summary
            .then(|| SinkHandle::spawn(LogSink::new("summary"), config.queue_capacity));

        info!(dir = %config.dir.display(), "Record log ready");

        Ok(Self {
            dir: config.dir.clone(),
            queue_capacity: config.queue_capacity,
            handles: Mutex::new(BTreeMap::new()),
            summary: Mutex::new(summary),
        })
    }

    /// Enqueue a record for its source's log file. Fire-and-forget: open or
    /// write failures are logged and counted, never returned to the producer.
    #[instrument(name = "record_log_append", skip(self, record), fields(source = %record.source()))]
    pub fn append(&self, record: &Record) {
        let source = record.source();
        let mut handles = self.handles.lock().expect("record log lock poisoned");

        if !handles.contains_key(&source) {
            match JsonlSink::open(source, &self.dir) {
                Ok(sink) => {
                    handles.insert(source, SinkHandle::spawn(sink, self.queue_capacity));
                }
                Err(e) => {
                    error!(source = %source, error = %e, "Failed to open source log");
                    return;
                }
            }
        }

        if let Some(handle) = handles.get(&source) {
            if !handle.try_send(record.clone()) {
                warn!(source = %source, "Record not appended to log");
            }
        }
        drop(handles);

        let summary = self.summary.lock().expect("record log lock poisoned");
        if let Some(summary) = summary.as_ref() {
            summary.try_send(record.clone());
        }
    }

    /// Sources that have an open log file.
    pub fn open_sources(&self) -> Vec<SourceId> {
        let handles = self.handles.lock().expect("record log lock poisoned");
        handles.keys().copied().collect()
    }

    /// Per-source sink metrics snapshots.
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        let handles = self.handles.lock().expect("record log lock poisoned");
        handles
            .values()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Drain outstanding writes and close every file.
    ///
    /// Callers bound this with a timeout; durability past that grace period
    /// is not guaranteed.
    #[instrument(name = "record_log_shutdown", skip(self))]
    pub async fn shutdown(&self) {
        let handles = {
            let mut map = self.handles.lock().expect("record log lock poisoned");
            std::mem::take(&mut *map)
        };

        for (source, handle) in handles {
            info!(source = %source, "Draining source log");
            handle.shutdown().await;
        }

        let summary = {
            let mut slot = self.summary.lock().expect("record log lock poisoned");
            slot.take()
        };
        if let Some(summary) = summary {
            summary.shutdown().await;
        }
    }
}
