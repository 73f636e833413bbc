//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::RelayError;

/// Default bind address. Port 5000 is where existing chat clients connect.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Default cap on a single inbound WebSocket message, in bytes.
const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(RelayError::Config(format!("unknown LOG_FORMAT: {other}"))),
        }
    }
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5000`).
    pub listen_addr: SocketAddr,

    /// Maximum size of a single inbound WebSocket message.
    pub max_message_bytes: usize,

    /// Log output format.
    pub log_format: LogFormat,

    /// Whether to attach a permissive CORS layer to HTTP routes.
    pub cors_permissive: bool,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` or `LOG_FORMAT` is set
    /// but cannot be parsed.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();

        let listen_addr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr
            .parse()
            .map_err(|e| RelayError::Config(format!("LISTEN_ADDR {listen_addr:?}: {e}")))?;

        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(v) => v.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            listen_addr,
            max_message_bytes: parse_env("MAX_MESSAGE_BYTES", DEFAULT_MAX_MESSAGE_BYTES),
            log_format,
            cors_permissive: parse_env_bool("CORS_PERMISSIVE", true),
        })
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            log_format: LogFormat::default(),
            cors_permissive: true,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean, returning `default` when
/// missing or unrecognized.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(default)
}

/// Accepts `"true"`, `"1"`, `"false"`, `"0"` (case-insensitive).
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
