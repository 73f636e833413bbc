//! Connection handles: the registry's view of one live client stream.
//!
//! A [`ConnectionHandle`] is a cheap, cloneable sender into the writer task
//! of a single WebSocket connection. The transport layer owns the socket and
//! the receiving end of the channel; the registry only ever holds clones of
//! the handle, so membership never keeps a socket alive.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::error::RelayError;

/// Unique identifier for a client connection.
///
/// Wraps a UUID v4 generated when the connection is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sending side of one client connection.
///
/// `send` never blocks: payloads are queued on an unbounded channel and
/// written to the socket by the connection's writer task in FIFO order.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
    open: Arc<AtomicBool>,
}

impl ConnectionHandle {
    /// Creates a handle together with the receiver its writer task drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            id: ConnectionId::new(),
            tx,
            open: Arc::new(AtomicBool::new(true)),
        };
        (handle, rx)
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while the connection accepts outbound payloads.
    ///
    /// Becomes `false` once [`close`](Self::close) is called on any clone or
    /// the receiving end has been dropped.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Queues a payload for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ConnectionClosed`] if the connection is no
    /// longer open.
    pub fn send(&self, payload: String) -> Result<(), RelayError> {
        if !self.is_open() {
            return Err(RelayError::ConnectionClosed(self.id));
        }
        self.tx
            .send(payload)
            .map_err(|_| RelayError::ConnectionClosed(self.id))
    }

    /// Marks the connection closed for every clone of this handle.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}
