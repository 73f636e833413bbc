//! Room inspection handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RoomSizeResponse;
use crate::app_state::AppState;
use crate::domain::RoomId;

/// `GET /rooms/{room_id}` — Current member count of a room.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    summary = "Room size",
    description = "Returns the number of connections currently joined to the room. Rooms with no members do not exist, so unknown rooms report a size of zero.",
    params(
        ("room_id" = String, Path, description = "Room identifier (case-sensitive)"),
    ),
    responses(
        (status = 200, description = "Room size", body = RoomSizeResponse),
    )
)]
pub async fn room_size_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    let size = state.registry.room_size(&RoomId::new(room_id.as_str())).await;
    (StatusCode::OK, Json(RoomSizeResponse { room_id, size }))
}

/// Room routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rooms/{room_id}", get(room_size_handler))
}
