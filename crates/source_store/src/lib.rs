//! # Source Store
//!
//! Per-source in-memory state: the latest accepted record and a bounded FIFO
//! history ring per source, plus the analysis window extractor.
//!
//! State for a source is created lazily on its first record and lives for the
//! process lifetime. Reads return snapshots and never block an `apply` on a
//! different source.

mod buffer;
mod store;
pub mod window;

pub use buffer::RecordBuffer;
pub use store::{RelayStore, SourceStats};
pub use window::{analysis_window, SourceSelector};
