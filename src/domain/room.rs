//! Room membership: a member list keyed by connection.

use super::connection::{ConnectionHandle, ConnectionId};
use super::room_id::Role;

/// One connection's membership in a room.
#[derive(Debug, Clone)]
pub struct Member {
    /// Sending side of the member's connection.
    pub handle: ConnectionHandle,
    /// Label supplied at join time.
    pub role: Role,
}

impl Member {
    /// Creates a member from a handle and its role.
    #[must_use]
    pub const fn new(handle: ConnectionHandle, role: Role) -> Self {
        Self { handle, role }
    }
}

/// Members of a single room.
///
/// Order is insertion order but carries no meaning. The registry removes a
/// `Room` as soon as it becomes empty, so a `Room` stored in the registry
/// always holds at least one member.
#[derive(Debug, Default)]
pub struct Room {
    members: Vec<Member>,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member.
    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Removes every entry belonging to `connection_id`, returning how many
    /// were removed.
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> usize {
        let before = self.members.len();
        self.members.retain(|m| m.handle.id() != connection_id);
        before.saturating_sub(self.members.len())
    }

    /// Returns clones of every member's handle.
    #[must_use]
    pub fn handles(&self) -> Vec<ConnectionHandle> {
        self.members.iter().map(|m| m.handle.clone()).collect()
    }

    /// Returns the member entry for `connection_id`, if present.
    #[must_use]
    pub fn member(&self, connection_id: ConnectionId) -> Option<&Member> {
        self.members.iter().find(|m| m.handle.id() == connection_id)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when no members remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
