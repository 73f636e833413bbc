//! Room-related DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Response body for `GET /rooms/{room_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomSizeResponse {
    /// Room identifier echoed from the path.
    pub room_id: String,
    /// Current number of members. Zero means the room does not exist.
    pub size: usize,
}
