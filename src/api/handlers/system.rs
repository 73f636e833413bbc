//! System endpoints: liveness, health check, fallback.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::RelayError;
use crate::ws::handler::upgrade;

/// Plain-text body returned by the liveness endpoint.
pub const LIVENESS_TEXT: &str = "WebSocket chat server is running.";

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    rooms: usize,
}

/// `GET /` — Liveness text, or a WebSocket upgrade if the request asks for one.
///
/// Clients that connect to the server root without a path still reach the
/// relay.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Liveness",
    description = "Returns a plain-text liveness message. Requests carrying WebSocket upgrade headers are upgraded instead.",
    responses(
        (status = 200, description = "Server is running", body = String, content_type = "text/plain"),
        (status = 101, description = "Switched to WebSocket"),
    )
)]
pub async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Ok(ws) => upgrade(ws, &state),
        Err(_) => (StatusCode::OK, LIVENESS_TEXT).into_response(),
    }
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and number of live rooms.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rooms: state.registry.room_count().await,
        }),
    )
}

/// Fallback for unmatched routes.
pub async fn not_found_handler(uri: Uri) -> RelayError {
    RelayError::NotFound(uri.path().to_string())
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
