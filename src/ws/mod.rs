//! WebSocket layer: upgrade handling, message parsing, connection loop.
//!
//! Clients connect at `/ws` (or upgrade at `/`), send `join-room` and
//! `chat-message` JSON messages, and receive `chat-message` events for the
//! room they joined.

pub mod connection;
pub mod handler;
pub mod messages;
