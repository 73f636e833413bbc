//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::{IntoResponse, Response};

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    upgrade(ws, &state)
}

/// Completes a WebSocket upgrade and hands the socket to the connection loop.
pub fn upgrade(ws: WebSocketUpgrade, state: &AppState) -> Response {
    let registry = Arc::clone(&state.registry);

    ws.max_message_size(state.config.max_message_bytes)
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| run_connection(socket, registry))
}
