//! RelayStore - the shared per-source state map.
//!
//! One `SourceState` per source id, created lazily on first record. An outer
//! read-mostly lock guards the map; each source state has its own mutex so
//! concurrent applies to different sources proceed independently while
//! applies to the same source are serialized in receipt order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use contracts::{Record, SourceId};
use tracing::debug;

use crate::buffer::RecordBuffer;

/// Latest record plus bounded history for one source.
struct SourceState {
    latest: Record,
    history: RecordBuffer,
}

impl SourceState {
    fn new(first: Record, capacity: usize) -> Self {
        let mut history = RecordBuffer::new(capacity);
        history.push(first.clone());
        Self {
            latest: first,
            history,
        }
    }

    fn apply(&mut self, record: Record) {
        self.history.push(record.clone());
        self.latest = record;
    }
}

/// Diagnostic counters for one source.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct SourceStats {
    /// Buffered record count
    pub history_len: usize,
    /// Records evicted from history so far
    pub evicted: u64,
    /// Out-of-order arrivals observed
    pub out_of_order: u64,
}

/// Process-scoped store of per-source state.
pub struct RelayStore {
    sources: RwLock<BTreeMap<SourceId, Arc<Mutex<SourceState>>>>,
    max_buffer: usize,
}

impl RelayStore {
    /// Create a store whose per-source history holds `max_buffer` records.
    pub fn new(max_buffer: usize) -> Self {
        Self {
            sources: RwLock::new(BTreeMap::new()),
            max_buffer,
        }
    }

    /// Apply an accepted record: replace `latest`, append to history.
    ///
    /// Applies for the same source are serialized by the per-source mutex;
    /// the caller observes them in invocation order.
    pub fn apply(&self, record: Record) {
        let source = record.source();
        let state = {
            let map = self.sources.read().expect("source map lock poisoned");
            map.get(&source).cloned()
        };

        match state {
            Some(state) => {
                let mut state = state.lock().expect("source state lock poisoned");
                state.apply(record);
            }
            None => {
                let mut map = self.sources.write().expect("source map lock poisoned");
                // Double-checked: another ingest may have created the state
                // between our read and write lock.
                match map.get(&source) {
                    Some(state) => {
                        let mut state = state.lock().expect("source state lock poisoned");
                        state.apply(record);
                    }
                    None => {
                        debug!(source = %source, "creating per-source state");
                        map.insert(
                            source,
                            Arc::new(Mutex::new(SourceState::new(record, self.max_buffer))),
                        );
                    }
                }
            }
        }
    }

    /// Latest accepted record for a source, if any.
    pub fn latest(&self, source: SourceId) -> Option<Record> {
        let map = self.sources.read().expect("source map lock poisoned");
        map.get(&source).map(|state| {
            let state = state.lock().expect("source state lock poisoned");
            state.latest.clone()
        })
    }

    /// Snapshot of a source's history in acceptance order.
    ///
    /// Empty for a source that has never produced a record.
    pub fn history(&self, source: SourceId) -> Vec<Record> {
        let map = self.sources.read().expect("source map lock poisoned");
        match map.get(&source) {
            Some(state) => {
                let state = state.lock().expect("source state lock poisoned");
                state.history.snapshot()
            }
            None => Vec::new(),
        }
    }

    /// Latest record of every known source, ascending by source id.
    ///
    /// This is the catch-up burst order for new subscribers.
    pub fn latest_all(&self) -> Vec<Record> {
        let map = self.sources.read().expect("source map lock poisoned");
        map.values()
            .map(|state| {
                let state = state.lock().expect("source state lock poisoned");
                state.latest.clone()
            })
            .collect()
    }

    /// Known source ids, ascending.
    pub fn sources(&self) -> Vec<SourceId> {
        let map = self.sources.read().expect("source map lock poisoned");
        map.keys().copied().collect()
    }

    /// Configured per-source history capacity.
    pub fn max_buffer(&self) -> usize {
        self.max_buffer
    }

    /// Diagnostic counters per source, ascending by source id.
    pub fn stats(&self) -> BTreeMap<SourceId, SourceStats> {
        let map = self.sources.read().expect("source map lock poisoned");
        map.iter()
            .map(|(source, state)| {
                let state = state.lock().expect("source state lock poisoned");
                (
                    *source,
                    SourceStats {
                        history_len: state.history.len(),
                        evicted: state.history.evicted_count(),
                        out_of_order: state.history.out_of_order_count(),
                    },
                )
            })
            .collect()
    }
}
