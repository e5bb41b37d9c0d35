//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{Relay, RelayRunConfig};

/// Execute the `run` command
pub async fn run_relay(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref bind) = args.bind {
        info!(bind = %bind, "Overriding bind address from CLI");
        blueprint.server.bind = bind.clone();
    }
    if let Some(ref dir) = args.log_dir {
        info!(dir = %dir.display(), "Overriding log directory from CLI");
        blueprint.log.dir = dir.clone();
    }
    if let Some(max_buffer) = args.max_buffer {
        info!(max_buffer, "Overriding history capacity from CLI");
        blueprint.relay.max_buffer = max_buffer;
    }

    info!(
        bind = %blueprint.server.bind,
        max_buffer = blueprint.relay.max_buffer,
        log_dir = %blueprint.log.dir.display(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build run configuration; CLI port wins over the config file
    let metrics_port = if args.metrics_port == 0 {
        blueprint.observability.metrics_port
    } else {
        Some(args.metrics_port)
    };
    let run_config = RelayRunConfig {
        blueprint,
        metrics_port,
    };

    // Create and run relay until shutdown signal
    let relay = Relay::new(run_config);

    info!("Starting relay...");

    let stats = relay.run().await.context("Relay execution failed")?;

    // Print detailed statistics
    stats.print_summary();

    info!("Posture Relay finished");
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::RelayBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Server:");
    println!("  Bind: {}", blueprint.server.bind);
    println!("\nRelay:");
    println!("  History capacity: {}", blueprint.relay.max_buffer);
    println!(
        "  Analysis window: {}..{} samples",
        blueprint.relay.window.min, blueprint.relay.window.max
    );
    println!("\nDurable log:");
    println!("  Directory: {}", blueprint.log.dir.display());
    println!("  Queue capacity: {}", blueprint.log.queue_capacity);
    println!("  Summary sink: {}", blueprint.log.summary);

    if let Some(port) = blueprint.observability.metrics_port {
        println!("\nObservability:");
        println!("  Metrics port: {port}");
    }

    println!();
}
