//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Posture Relay - telemetry relay and fan-out broadcaster
#[derive(Parser, Debug)]
#[command(
    name = "posture-relay",
    author,
    version,
    about = "Posture telemetry relay and fan-out broadcaster",
    long_about = "A telemetry relay for wearable posture sensor nodes.\n\n\
                  Accepts samples and events over HTTP, keeps per-source latest \n\
                  and bounded history, appends every record to per-source jsonl \n\
                  logs, and streams accepted records to WebSocket viewers."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "POSTURE_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "POSTURE_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay server
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "POSTURE_RELAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Override bind address from configuration
    #[arg(long, env = "POSTURE_RELAY_BIND")]
    pub bind: Option<String>,

    /// Override log directory from configuration
    #[arg(long, env = "POSTURE_RELAY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Override per-source history capacity from configuration
    #[arg(long, env = "POSTURE_RELAY_MAX_BUFFER")]
    pub max_buffer: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "POSTURE_RELAY_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without running the relay
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
