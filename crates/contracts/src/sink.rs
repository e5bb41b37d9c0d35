//! RecordSink trait - durable log output interface
//!
//! Defines the abstract interface for record sinks.

use crate::{Record, RelayError};

/// Record output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append one record
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, record: &Record) -> Result<(), RelayError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), RelayError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), RelayError>;
}
