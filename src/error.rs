//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Errors raised on
//! the WebSocket path are absorbed and logged; the protocol has no error
//! message type. Only the HTTP surface turns a [`RelayError`] into a
//! structured JSON response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ConnectionId;

/// Structured JSON error response body.
///
/// All HTTP error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2004,
///     "message": "route not found: /nope"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`RelayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Relay error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Malformed input | 400 Bad Request           |
/// | 2000–2999 | State/Not Found | 404 Not Found / 410 Gone  |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Inbound payload could not be parsed into a known message shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Attempted to send to a connection that is no longer open.
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    /// No HTTP route matches the requested path.
    #[error("route not found: {0}")]
    NotFound(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedMessage(_) => 1001,
            Self::ConnectionClosed(_) => 2001,
            Self::NotFound(_) => 2004,
            Self::Config(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedMessage(_) => StatusCode::BAD_REQUEST,
            Self::ConnectionClosed(_) => StatusCode::GONE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedMessage(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
