//! Sink implementations
//!
//! Contains JsonlSink (per-source durable log) and LogSink (tracing summary).

mod jsonl;
mod log;

pub use self::jsonl::JsonlSink;
pub use self::log::LogSink;
