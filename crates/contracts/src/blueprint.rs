//! RelayBlueprint - runtime configuration
//!
//! Deserialized from TOML/JSON by `config_loader`, semantic checks live in
//! `config_loader::validator`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayBlueprint {
    /// HTTP/WebSocket server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// In-memory relay configuration
    #[serde(default)]
    pub relay: RelayConfig,

    /// Durable log configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityOptions,
}

impl Default for RelayBlueprint {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            relay: RelayConfig::default(),
            log: LogConfig::default(),
            observability: ObservabilityOptions::default(),
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, `host:port`
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

/// In-memory store and analysis window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Per-source history capacity (FIFO eviction beyond this)
    #[serde(default = "default_max_buffer")]
    pub max_buffer: usize,

    /// Analysis window clamp bounds
    #[serde(default)]
    pub window: WindowBounds,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_buffer: default_max_buffer(),
            window: WindowBounds::default(),
        }
    }
}

fn default_max_buffer() -> usize {
    2000
}

/// Analysis window size bounds (record counts)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowBounds {
    /// Smallest window handed to analysis
    #[serde(default = "default_min_window")]
    pub min: usize,

    /// Largest window handed to analysis
    #[serde(default = "default_max_window")]
    pub max: usize,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            min: default_min_window(),
            max: default_max_window(),
        }
    }
}

fn default_min_window() -> usize {
    20
}

fn default_max_window() -> usize {
    600
}

/// Durable append-only log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding one `source-<id>.jsonl` file per source
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    /// Per-source append queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Also log a one-line summary of every appended record
    #[serde(default)]
    pub summary: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            queue_capacity: default_queue_capacity(),
            summary: false,
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_queue_capacity() -> usize {
    256
}

/// Metrics exporter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityOptions {
    /// Prometheus exporter port (None = disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}
