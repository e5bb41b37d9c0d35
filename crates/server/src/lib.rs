//! # Server
//!
//! The network surface of the relay: HTTP ingest and query endpoints plus the
//! WebSocket streaming interface for viewer clients. All state lives in the
//! shared components wired in by the caller; handlers stay thin.

pub mod routes;
pub mod ws;

pub use routes::{create_router, RelayState};
