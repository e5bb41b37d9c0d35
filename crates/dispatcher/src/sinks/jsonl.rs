//! JsonlSink - append-only newline-delimited JSON, one file per source

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{Record, RecordSink, RelayError, SourceId};
use tracing::{debug, instrument};

/// Sink that appends one serialized record per line to `source-<id>.jsonl`.
///
/// The file is opened append/create at construction and never rewritten or
/// compacted; an external reader may tail it. Lines are buffered; the worker
/// flushes whenever its queue drains, so the tail stays current between
/// bursts. Durability stops at the OS page cache.
pub struct JsonlSink {
    name: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    lines_written: u64,
}

impl JsonlSink {
    /// Open (or create) the log file for one source under `dir`.
    pub fn open(source: SourceId, dir: &Path) -> Result<Self, RelayError> {
        let name = format!("jsonl:{source}");
        let path = dir.join(source.log_file_name());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| RelayError::sink_connection(&name, e.to_string()))?;

        debug!(sink = %name, path = %path.display(), "JsonlSink opened");

        Ok(Self {
            name,
            path,
            writer: Some(BufWriter::new(file)),
            lines_written: 0,
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines appended since open.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn append_line(&mut self, record: &Record) -> Result<(), RelayError> {
        let line = serde_json::to_string(record)
            .map_err(|e| RelayError::sink_write(&self.name, format!("serialize error: {e}")))?;

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| RelayError::sink_write(&self.name, "file closed"))?;

        writeln!(writer, "{line}")
            .map_err(|e| RelayError::sink_write(&self.name, e.to_string()))?;
        self.lines_written += 1;
        Ok(())
    }
}

impl RecordSink for JsonlSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "jsonl_sink_write",
        skip(self, record),
        fields(sink = %self.name, source = %record.source())
    )]
    async fn write(&mut self, record: &Record) -> Result<(), RelayError> {
        self.append_line(record)
    }

    #[instrument(name = "jsonl_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), RelayError> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| RelayError::sink_write(&self.name, e.to_string()))?;
        }
        Ok(())
    }

    #[instrument(name = "jsonl_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), RelayError> {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
        debug!(sink = %self.name, lines = self.lines_written, "JsonlSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Event, Sample};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_jsonl_sink_appends_one_line_per_record() {
        let dir = tempdir().unwrap();
        let mut sink = JsonlSink::open(SourceId::new(2), dir.path()).unwrap();

        let record = Record::Event(Event {
            source: SourceId::new(2),
            event: "button_click".to_string(),
            ts: 123_456,
            extra: BTreeMap::new(),
        });

        sink.write(&record).await.unwrap();
        sink.flush().await.unwrap();
        assert!(sink.path().ends_with("source-2.jsonl"));

        let content = std::fs::read_to_string(dir.path().join("source-2.jsonl")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({
                "kind": "event",
                "event": "button_click",
                "ts": 123_456,
                "source": 2,
            })
        );
    }

    #[tokio::test]
    async fn test_jsonl_sink_reopen_appends() {
        let dir = tempdir().unwrap();
        let record = Record::Sample(Sample {
            source: SourceId::new(1),
            pitch: 10.0,
            ax: None,
            ay: None,
            az: None,
            pitch_smooth: None,
            roll: None,
            a_mag: None,
            dpitch: None,
            baseline_pitch: None,
            button: None,
            button_click: None,
            ts: 1,
        });

        {
            let mut sink = JsonlSink::open(SourceId::new(1), dir.path()).unwrap();
            sink.write(&record).await.unwrap();
            sink.close().await.unwrap();
        }
        {
            let mut sink = JsonlSink::open(SourceId::new(1), dir.path()).unwrap();
            sink.write(&record).await.unwrap();
            sink.flush().await.unwrap();
        }

        let content = std::fs::read_to_string(dir.path().join("source-1.jsonl")).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_jsonl_sink_open_fails_on_missing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");
        let result = JsonlSink::open(SourceId::new(1), &missing);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_after_close_errors() {
        let dir = tempdir().unwrap();
        let mut sink = JsonlSink::open(SourceId::new(1), dir.path()).unwrap();
        sink.close().await.unwrap();

        let record = Record::Event(Event {
            source: SourceId::new(1),
            event: "x".to_string(),
            ts: 1,
            extra: BTreeMap::new(),
        });
        assert!(sink.write(&record).await.is_err());
    }
}
