//! Relay orchestrator - assembles and runs all components.
//!
//! Store, durable log, hub, coordinator and the axum server are wired here;
//! the server runs until a shutdown signal arrives, then the log is drained
//! with a bounded grace period.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::RelayBlueprint;
use dispatcher::{BroadcastHub, RecordLog};
use ingestion::IngestCoordinator;
use server::RelayState;
use source_store::RelayStore;
use tracing::{info, warn};

use super::RelayStats;

/// Grace period for draining outstanding log appends at shutdown.
const LOG_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Relay run configuration
#[derive(Debug, Clone)]
pub struct RelayRunConfig {
    /// The relay blueprint configuration
    pub blueprint: RelayBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main relay orchestrator
pub struct Relay {
    config: RelayRunConfig,
}

impl Relay {
    /// Create a new relay with the given configuration
    pub fn new(config: RelayRunConfig) -> Self {
        Self { config }
    }

    /// Run the relay until shutdown
    pub async fn run(self) -> Result<RelayStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Assemble components. An unusable log directory or bind address is
        // fatal here, before any producer connects.
        info!(max_buffer = blueprint.relay.max_buffer, "Setting up source store...");
        let store = Arc::new(RelayStore::new(blueprint.relay.max_buffer));

        info!(dir = %blueprint.log.dir.display(), "Setting up record log...");
        let log = Arc::new(
            RecordLog::new(&blueprint.log).context("Failed to initialize record log")?,
        );

        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store)));
        let coordinator = Arc::new(IngestCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&log),
            Arc::clone(&hub),
        ));

        let state = RelayState {
            coordinator: Arc::clone(&coordinator),
            window: blueprint.relay.window,
        };
        let router = server::create_router(state);

        let addr: SocketAddr = blueprint
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", blueprint.server.bind))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!(addr = %addr, "Relay listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Shutting down relay...");

        // Snapshot counters before the log handles are consumed by the drain
        let mut stats = collect_stats(&coordinator, start_time);

        // Drain outstanding appends up to the grace period
        if tokio::time::timeout(LOG_DRAIN_GRACE, log.shutdown())
            .await
            .is_err()
        {
            warn!(
                grace_secs = LOG_DRAIN_GRACE.as_secs(),
                "Log drain timed out, some appends may be lost"
            );
        }
        stats.duration = start_time.elapsed();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            rate = format!("{:.2}", stats.rate()),
            "Relay shutdown complete"
        );

        Ok(stats)
    }
}

/// Gather final statistics from component metrics.
fn collect_stats(coordinator: &IngestCoordinator, start_time: Instant) -> RelayStats {
    let (log_dropped, log_failures) = coordinator
        .log()
        .metrics()
        .iter()
        .fold((0, 0), |(dropped, failures), (_, snapshot)| {
            (
                dropped + snapshot.dropped_count,
                failures + snapshot.failure_count,
            )
        });

    RelayStats {
        ingest: coordinator.metrics().snapshot(),
        hub: coordinator.hub().metrics().snapshot(),
        active_sources: coordinator.store().sources().len(),
        log_dropped,
        log_failures,
        duration: start_time.elapsed(),
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
