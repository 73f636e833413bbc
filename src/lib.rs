//! # room-relay
//!
//! Real-time WebSocket relay for named rooms.
//!
//! Clients open a WebSocket, send `join-room` to become a member of a room,
//! and send `chat-message` to have the server fan the message out to every
//! open member of that room (the sender included). When a connection
//! closes, it is removed from its room and empty rooms are discarded.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     └── RoomRegistry (domain/)
//!            ├── Room → Member(ConnectionHandle, Role)
//!            └── connection → room index
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ws;
