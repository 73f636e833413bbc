//! Domain layer: identifiers, connection handles, and the room registry.
//!
//! This module contains the relay's state model: opaque room and role
//! identifiers, the per-connection sending handle, room membership, the
//! outbound event type, and the [`RoomRegistry`] that ties them together.

pub mod connection;
pub mod room;
pub mod room_event;
pub mod room_id;
pub mod room_registry;

pub use connection::{ConnectionHandle, ConnectionId};
pub use room::{Member, Room};
pub use room_event::RoomEvent;
pub use room_id::{Role, RoomId};
pub use room_registry::{JoinOutcome, RoomRegistry};
