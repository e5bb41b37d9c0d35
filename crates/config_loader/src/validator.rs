//! Configuration validation.
//!
//! Rules:
//! - server.bind parses as a socket address
//! - relay.max_buffer > 0
//! - relay.window.min <= relay.window.max, both > 0
//! - log.dir non-empty
//! - log.queue_capacity > 0

use std::net::SocketAddr;

use contracts::{RelayBlueprint, RelayError};

/// Validate a RelayBlueprint.
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &RelayBlueprint) -> Result<(), RelayError> {
    validate_server(blueprint)?;
    validate_relay(blueprint)?;
    validate_log(blueprint)?;
    Ok(())
}

fn validate_server(blueprint: &RelayBlueprint) -> Result<(), RelayError> {
    blueprint
        .server
        .bind
        .parse::<SocketAddr>()
        .map_err(|e| {
            RelayError::config_validation(
                "server.bind",
                format!("invalid bind address '{}': {e}", blueprint.server.bind),
            )
        })?;
    Ok(())
}

fn validate_relay(blueprint: &RelayBlueprint) -> Result<(), RelayError> {
    let relay = &blueprint.relay;

    if relay.max_buffer == 0 {
        return Err(RelayError::config_validation(
            "relay.max_buffer",
            "max_buffer must be > 0",
        ));
    }

    if relay.window.min == 0 {
        return Err(RelayError::config_validation(
            "relay.window.min",
            "window.min must be > 0",
        ));
    }

    if relay.window.min > relay.window.max {
        return Err(RelayError::config_validation(
            "relay.window.min / relay.window.max",
            format!(
                "window.min ({}) must be <= window.max ({})",
                relay.window.min, relay.window.max
            ),
        ));
    }

    Ok(())
}

fn validate_log(blueprint: &RelayBlueprint) -> Result<(), RelayError> {
    let log = &blueprint.log;

    if log.dir.as_os_str().is_empty() {
        return Err(RelayError::config_validation(
            "log.dir",
            "log directory cannot be empty",
        ));
    }

    if log.queue_capacity == 0 {
        return Err(RelayError::config_validation(
            "log.queue_capacity",
            "queue_capacity must be > 0",
        ));
    }

    Ok(())
}
