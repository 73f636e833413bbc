//! Room membership registry and broadcast dispatcher.
//!
//! [`RoomRegistry`] maps room identifiers to their members and fans chat
//! messages out to every open member of a room. All membership state sits
//! behind one [`tokio::sync::RwLock`]:
//!
//! - `join` and `leave` take the write lock.
//! - `broadcast` takes the read lock only long enough to snapshot the
//!   member handles, then sends with the lock released.
//!
//! Sends go through [`ConnectionHandle::send`], which never blocks, so a
//! slow consumer cannot stall other members or unrelated rooms.
//!
//! A connection belongs to at most one room. Joining while already a member
//! somewhere moves the connection: the old membership is removed first. The
//! registry keeps a reverse index from connection to room so that `leave`
//! needs only the handle.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::connection::{ConnectionHandle, ConnectionId};
use super::room::{Member, Room};
use super::room_event::RoomEvent;
use super::room_id::{Role, RoomId};

/// Result of a [`RoomRegistry::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Member count of the joined room after the join.
    pub room_size: usize,
    /// Room the connection was moved out of, if it was already a member.
    pub previous_room: Option<RoomId>,
}

#[derive(Debug, Default)]
struct RegistryState {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
}

impl RegistryState {
    /// Removes `connection_id` from whatever room it is in, deleting the
    /// room if it ends up empty. Returns the room it was removed from.
    fn detach(&mut self, connection_id: ConnectionId) -> Option<RoomId> {
        let room_id = self.memberships.remove(&connection_id)?;
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.remove_connection(connection_id);
            if room.is_empty() {
                self.rooms.remove(&room_id);
                tracing::debug!(%room_id, "room emptied and removed");
            }
        }
        Some(room_id)
    }
}

/// Process-wide room membership store.
///
/// Constructed once at startup and shared through
/// [`crate::app_state::AppState`].
#[derive(Debug, Default)]
pub struct RoomRegistry {
    state: RwLock<RegistryState>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` to `room_id` with the given role, creating the room if
    /// needed.
    ///
    /// If the connection is already a member of a room (this one or another)
    /// it is removed from there first, so the connection never appears twice.
    pub async fn join(&self, room_id: RoomId, handle: ConnectionHandle, role: Role) -> JoinOutcome {
        let connection_id = handle.id();
        let outcome = {
            let mut state = self.state.write().await;
            let previous_room = state.detach(connection_id);
            let room = state.rooms.entry(room_id.clone()).or_default();
            room.push(Member::new(handle, role.clone()));
            let room_size = room.len();
            state.memberships.insert(connection_id, room_id.clone());
            JoinOutcome {
                room_size,
                previous_room,
            }
        };

        if let Some(previous) = &outcome.previous_room {
            tracing::debug!(%connection_id, from = %previous, to = %room_id, "connection moved rooms");
        }
        tracing::info!(
            %connection_id,
            %room_id,
            %role,
            total = outcome.room_size,
            "{role} joined room {room_id}"
        );
        outcome
    }

    /// Removes the connection behind `handle` from its room.
    ///
    /// Deletes the room if it becomes empty. Calling this for a handle that
    /// is not a member (never joined, or already removed) is a no-op.
    ///
    /// Returns the room the connection was removed from.
    pub async fn leave(&self, handle: &ConnectionHandle) -> Option<RoomId> {
        let connection_id = handle.id();
        let removed = self.state.write().await.detach(connection_id);
        if let Some(room_id) = &removed {
            tracing::info!(%connection_id, %room_id, "client disconnected from room {room_id}");
        }
        removed
    }

    /// Sends a `chat-message` event to every open member of `room_id`,
    /// including the sender's own connection.
    ///
    /// `sender` and `message` are relayed verbatim. Closed members and failed
    /// sends are skipped. Broadcasting to a room that does not exist does
    /// nothing.
    ///
    /// Returns the number of members the event was queued to.
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        sender: impl Into<serde_json::Value>,
        message: impl Into<serde_json::Value>,
    ) -> usize {
        self.broadcast_event(room_id, RoomEvent::chat(sender, message))
            .await
    }

    /// Sends `event` to every open member of `room_id`.
    ///
    /// Same delivery rules as [`broadcast`](Self::broadcast).
    pub async fn broadcast_event(&self, room_id: &RoomId, event: RoomEvent) -> usize {
        let recipients = {
            let state = self.state.read().await;
            match state.rooms.get(room_id) {
                Some(room) => room.handles(),
                None => {
                    tracing::debug!(%room_id, "broadcast to unknown room ignored");
                    return 0;
                }
            }
        };

        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(%room_id, error = %e, "failed to serialize room event");
                return 0;
            }
        };

        let mut delivered = 0;
        for handle in &recipients {
            if !handle.is_open() {
                tracing::trace!(connection_id = %handle.id(), "skipping closed member");
                continue;
            }
            match handle.send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::debug!(%room_id, error = %e, "skipping member"),
            }
        }

        tracing::debug!(
            %room_id,
            event = event.event_type_str(),
            delivered,
            members = recipients.len(),
            "broadcast dispatched"
        );
        delivered
    }

    /// Returns the number of members in `room_id`, or 0 if it does not exist.
    pub async fn room_size(&self, room_id: &RoomId) -> usize {
        self.state
            .read()
            .await
            .rooms
            .get(room_id)
            .map_or(0, Room::len)
    }

    /// Returns the number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    /// Returns the room `connection_id` currently belongs to.
    pub async fn connection_room(&self, connection_id: ConnectionId) -> Option<RoomId> {
        self.state
            .read()
            .await
            .memberships
            .get(&connection_id)
            .cloned()
    }

    /// Returns the role `connection_id` joined its current room with.
    pub async fn connection_role(&self, connection_id: ConnectionId) -> Option<Role> {
        let state = self.state.read().await;
        let room_id = state.memberships.get(&connection_id)?;
        state
            .rooms
            .get(room_id)?
            .member(connection_id)
            .map(|m| m.role.clone())
    }
}
