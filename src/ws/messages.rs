//! Inbound WebSocket message types and parsing.
//!
//! Clients send JSON objects discriminated by a `type` field. Two kinds are
//! recognized; anything else is ignored. Outbound events are defined in
//! [`crate::domain::RoomEvent`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::{Role, RoomId};
use crate::error::RelayError;

/// Wire discriminator for [`InboundMessage::JoinRoom`].
pub const JOIN_ROOM: &str = "join-room";

/// Wire discriminator for [`InboundMessage::ChatMessage`].
pub const CHAT_MESSAGE: &str = "chat-message";

/// Messages a client can send over the WebSocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// Register the sending connection as a member of a room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        /// Room to join.
        room_id: RoomId,
        /// Label to attach to the membership. Missing roles join as `""`.
        #[serde(default)]
        role: Role,
    },
    /// Relay a message to every member of a room.
    #[serde(rename_all = "camelCase")]
    ChatMessage {
        /// Target room.
        room_id: RoomId,
        /// Sender label, echoed to recipients; any JSON value.
        #[serde(default, deserialize_with = "present")]
        sender: Option<Value>,
        /// Message body; any JSON value.
        #[serde(default, deserialize_with = "present")]
        message: Option<Value>,
    },
}

/// Maps a field that is present to `Some`, keeping an explicit `null` as
/// `Some(Value::Null)`. Absent fields fall back to `None` via `default`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Parses a raw text frame.
///
/// Returns `Ok(None)` for well-formed JSON whose `type` is not a recognized
/// kind, so callers can ignore it without treating it as an error.
///
/// # Errors
///
/// Returns [`RelayError::MalformedMessage`] if the text is not a JSON object
/// or a recognized kind is missing required fields.
pub fn parse_inbound(text: &str) -> Result<Option<InboundMessage>, RelayError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let Some(kind) = value.get("type").and_then(serde_json::Value::as_str) else {
        if value.is_object() {
            return Ok(None);
        }
        return Err(RelayError::MalformedMessage(
            "expected a JSON object".to_string(),
        ));
    };
    if kind != JOIN_ROOM && kind != CHAT_MESSAGE {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
