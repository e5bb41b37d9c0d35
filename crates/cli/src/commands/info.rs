//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Reading configuration");

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&blueprint)
            .context("Failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    println!("\n=== Posture Relay Configuration ===\n");
    println!("Server:");
    println!("  Bind address: {}", blueprint.server.bind);

    println!("\nRelay:");
    println!("  History capacity: {} records/source", blueprint.relay.max_buffer);
    println!(
        "  Analysis window bounds: {}..{} samples",
        blueprint.relay.window.min, blueprint.relay.window.max
    );

    println!("\nDurable log:");
    println!("  Directory: {}", blueprint.log.dir.display());
    println!("  Append queue capacity: {}", blueprint.log.queue_capacity);
    println!("  Summary sink: {}", if blueprint.log.summary { "on" } else { "off" });

    println!("\nObservability:");
    match blueprint.observability.metrics_port {
        Some(port) => println!("  Prometheus metrics: port {port}"),
        None => println!("  Prometheus metrics: disabled"),
    }

    println!();
    Ok(())
}
