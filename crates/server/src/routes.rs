//! HTTP routes: ingest, queries, stats.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contracts::{SourceId, WindowBounds};
use ingestion::IngestCoordinator;
use serde::Deserialize;
use serde_json::{json, Value};
use source_store::{analysis_window, SourceSelector};

/// Shared handler state.
#[derive(Clone)]
pub struct RelayState {
    pub coordinator: Arc<IngestCoordinator>,
    pub window: WindowBounds,
}

/// Build the relay router.
pub fn create_router(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ingest/{source}", post(ingest))
        .route("/latest/{source}", get(latest))
        .route("/history/{source}", get(history))
        .route("/window", get(window))
        .route("/stats", get(stats))
        .route("/ws", get(crate::ws::ws_handler))
        .with_state(state)
}

async fn ingest(
    State(state): State<RelayState>,
    Path(source): Path<u16>,
    Json(raw): Json<Value>,
) -> Response {
    match state.coordinator.ingest(&raw, SourceId::new(source)) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) if e.is_validation() => (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error": e.to_string()})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"ok": false, "error": e.to_string()})),
        )
            .into_response(),
    }
}

async fn latest(State(state): State<RelayState>, Path(source): Path<u16>) -> Response {
    match state.coordinator.store().latest(SourceId::new(source)) {
        Some(record) => Json(record).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("no records for source {source}")})),
        )
            .into_response(),
    }
}

async fn history(State(state): State<RelayState>, Path(source): Path<u16>) -> Response {
    Json(state.coordinator.store().history(SourceId::new(source))).into_response()
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    size: Option<usize>,
}

async fn window(State(state): State<RelayState>, Query(query): Query<WindowQuery>) -> Response {
    let selector = match query.source.as_deref().unwrap_or("both").parse::<SourceSelector>() {
        Ok(selector) => selector,
        Err(reason) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": reason}))).into_response();
        }
    };

    let size = query.size.unwrap_or(state.window.max);
    let samples = analysis_window(state.coordinator.store(), selector, size, &state.window);
    Json(samples).into_response()
}

async fn stats(State(state): State<RelayState>) -> Response {
    let coordinator = &state.coordinator;
    Json(json!({
        "ingest": coordinator.metrics().snapshot(),
        "hub": coordinator.hub().metrics().snapshot(),
        "sources": coordinator.store().stats(),
        "log": coordinator
            .log()
            .metrics()
            .into_iter()
            .collect::<std::collections::BTreeMap<_, _>>(),
    }))
    .into_response()
}
