//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    bind: String,
    max_buffer: usize,
    window_min: usize,
    window_max: usize,
    log_dir: String,
    metrics_port: Option<u16>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration is invalid");
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some("file not found".to_string()),
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            summary: Some(ConfigSummary {
                bind: blueprint.server.bind.clone(),
                max_buffer: blueprint.relay.max_buffer,
                window_min: blueprint.relay.window.min,
                window_max: blueprint.relay.window.max,
                log_dir: blueprint.log.dir.display().to_string(),
                metrics_port: blueprint.observability.metrics_port,
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            summary: None,
        },
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("Configuration is valid: {}", result.config_path);
        if let Some(ref summary) = result.summary {
            println!("  Bind: {}", summary.bind);
            println!("  History capacity: {}", summary.max_buffer);
            println!(
                "  Analysis window: {}..{}",
                summary.window_min, summary.window_max
            );
            println!("  Log directory: {}", summary.log_dir);
            if let Some(port) = summary.metrics_port {
                println!("  Metrics port: {port}");
            }
        }
    } else {
        println!("Configuration is INVALID: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("  Error: {error}");
        }
    }
}
