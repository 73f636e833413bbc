//! Events fanned out to room members.
//!
//! A [`RoomEvent`] is serialized once per broadcast and the resulting JSON
//! text is queued to every open member of the room.

use serde::Serialize;
use serde_json::Value;

/// Outbound event delivered to each member of a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoomEvent {
    /// A chat message relayed verbatim from a member.
    ///
    /// Fields the client left out stay out of the relayed event; an explicit
    /// `null` is relayed as `null`.
    ChatMessage {
        /// Sender label as supplied by the client, any JSON value.
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<Value>,
        /// Message body, passed through untouched.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<Value>,
    },
}

impl RoomEvent {
    /// Builds a chat event with both fields present.
    #[must_use]
    pub fn chat(sender: impl Into<Value>, message: impl Into<Value>) -> Self {
        Self::ChatMessage {
            sender: Some(sender.into()),
            message: Some(message.into()),
        }
    }

    /// Returns the wire `type` discriminator.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ChatMessage { .. } => "chat-message",
        }
    }
}
