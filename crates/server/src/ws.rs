//! WebSocket streaming interface for viewer clients.
//!
//! Each connection is one hub subscriber: the catch-up burst arrives first,
//! then every accepted record as one JSON text message. The subscription is
//! released on every exit path (client close, send failure, read error).

use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error};

use crate::routes::RelayState;

/// Upgrade handler for `GET /ws`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<RelayState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| subscriber_loop(socket, state))
}

/// Drive one viewer connection until it closes or fails.
async fn subscriber_loop(socket: WebSocket, state: RelayState) {
    let hub = Arc::clone(state.coordinator.hub());
    let mut subscription = hub.subscribe();
    let subscriber = subscription.id;

    debug!(subscriber, "Viewer connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            record = subscription.recv() => {
                let Some(record) = record else { break };
                let text = match serde_json::to_string(&record) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(subscriber, error = %e, "Record serialization failed");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    // Transport gone; drop this subscriber only
                    break;
                }
            }
            incoming = ws_rx.next() => {
                match incoming {
                    // Viewers don't send data; tolerate pings and chatter
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unsubscribe(subscriber);
    debug!(subscriber, "Viewer disconnected");
}
