//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::dto::RoomSizeResponse;
use super::handlers::{rooms, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "room-relay",
        description = "WebSocket room relay. Connect at `/ws`, send `join-room` then `chat-message` JSON messages."
    ),
    paths(
        system::root_handler,
        system::health_handler,
        rooms::room_size_handler,
    ),
    components(schemas(
        system::HealthResponse,
        RoomSizeResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness and health"),
        (name = "Rooms", description = "Room membership inspection"),
    )
)]
pub struct ApiDoc;
