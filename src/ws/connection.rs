//! Per-connection read/write loop.
//!
//! Each accepted WebSocket gets a [`ConnectionHandle`] and a writer task
//! that drains the handle's channel into the socket. The read loop parses
//! inbound frames and routes them to the [`RoomRegistry`]. When the client
//! goes away, the connection leaves its room exactly once.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{InboundMessage, parse_inbound};
use crate::domain::{ConnectionHandle, RoomEvent, RoomRegistry};

/// How long the writer gets to flush queued events and the close frame
/// once the read side has finished.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, registry: Arc<RoomRegistry>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (handle, mut outbound_rx) = ConnectionHandle::channel();
    let connection_id = handle.id();
    tracing::info!(%connection_id, "new websocket connection");

    let mut writer = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if ws_tx.send(Message::text(payload)).await.is_err() {
                return;
            }
        }
        // Every sender is gone: finish the close handshake.
        let _ = ws_tx.close().await;
    });

    let mut writer_done = false;
    loop {
        tokio::select! {
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        dispatch(text.as_str(), &handle, &registry).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => dispatch(text, &handle, &registry).await,
                        Err(e) => {
                            tracing::warn!(%connection_id, error = %e, "dropping non-utf8 binary frame");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(%connection_id, error = %e, "websocket read error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            // Writer stops when the socket rejects a send.
            _ = &mut writer => {
                writer_done = true;
                break;
            }
        }
    }

    handle.close();
    registry.leave(&handle).await;
    // The registry held the only other senders; dropping ours ends the
    // writer's queue so it can send the close frame.
    drop(handle);
    if !writer_done && tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_err() {
        tracing::debug!(%connection_id, "writer did not finish in time");
        writer.abort();
    }

    tracing::debug!(%connection_id, "ws connection closed");
}

/// Routes one inbound text payload to the registry.
///
/// Malformed payloads are logged and dropped; unknown kinds are ignored.
/// Neither affects the connection or any room.
pub(crate) async fn dispatch(text: &str, handle: &ConnectionHandle, registry: &RoomRegistry) {
    match parse_inbound(text) {
        Ok(Some(InboundMessage::JoinRoom { room_id, role })) => {
            registry.join(room_id, handle.clone(), role).await;
        }
        Ok(Some(InboundMessage::ChatMessage {
            room_id,
            sender,
            message,
        })) => {
            registry
                .broadcast_event(&room_id, RoomEvent::ChatMessage { sender, message })
                .await;
        }
        Ok(None) => {
            tracing::debug!(connection_id = %handle.id(), "ignoring unrecognized message type");
        }
        Err(e) => {
            tracing::warn!(connection_id = %handle.id(), error = %e, "failed to parse message");
        }
    }
}
