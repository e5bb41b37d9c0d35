//! LogSink - logs record summary via tracing

use contracts::{Record, RecordSink, RelayError};
use tracing::{info, instrument};

/// Sink that logs one-line record summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_record_summary(&self, record: &Record) {
        match record {
            Record::Sample(s) => {
                info!(
                    sink = %self.name,
                    source = %s.source,
                    kind = "sample",
                    pitch = s.pitch,
                    ts = s.ts,
                    "Record appended"
                );
            }
            Record::Event(e) => {
                info!(
                    sink = %self.name,
                    source = %e.source,
                    kind = "event",
                    event = %e.event,
                    ts = e.ts,
                    "Record appended"
                );
            }
        }
    }
}

impl RecordSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, record),
        fields(sink = %self.name, source = %record.source())
    )]
    async fn write(&mut self, record: &Record) -> Result<(), RelayError> {
        self.log_record_summary(record);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), RelayError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), RelayError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
