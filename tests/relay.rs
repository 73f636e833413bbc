//! End-to-end tests: boot the relay on an ephemeral port and drive it with
//! real WebSocket and HTTP clients.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use room_relay::api::build_app;
use room_relay::app_state::AppState;
use room_relay::config::RelayConfig;
use room_relay::domain::{RoomId, RoomRegistry};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(2);

async fn spawn_server() -> (SocketAddr, Arc<RoomRegistry>) {
    let registry = Arc::new(RoomRegistry::new());
    let app = build_app(AppState::new(Arc::clone(&registry), RelayConfig::default()));

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, registry)
}

async fn connect(addr: SocketAddr, path: &str) -> Client {
    let Ok((client, _response)) = connect_async(format!("ws://{addr}{path}")).await else {
        panic!("websocket connect to {path}");
    };
    client
}

async fn send_json(client: &mut Client, value: Value) {
    let Ok(()) = client.send(Message::text(value.to_string())).await else {
        panic!("send failed");
    };
}

async fn recv_json(client: &mut Client) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(WAIT, client.next()).await else {
            panic!("no message within {WAIT:?}");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("server sent non-JSON text: {text}");
            };
            return value;
        }
    }
}

async fn assert_silent(client: &mut Client) {
    let outcome = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(outcome.is_err(), "unexpected message: {outcome:?}");
}

async fn wait_for_size(registry: &RoomRegistry, room: &str, expected: usize) {
    let room_id = RoomId::from(room);
    let deadline = tokio::time::Instant::now() + WAIT;
    while registry.room_size(&room_id).await != expected {
        if tokio::time::Instant::now() > deadline {
            panic!("room {room} never reached size {expected}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn join(room: &str, role: &str) -> Value {
    json!({ "type": "join-room", "roomId": room, "role": role })
}

fn chat(room: &str, sender: &str, message: Value) -> Value {
    json!({ "type": "chat-message", "roomId": room, "sender": sender, "message": message })
}

#[tokio::test]
async fn chat_reaches_both_members_including_sender() {
    let (addr, registry) = spawn_server().await;
    let mut caller = connect(addr, "/ws").await;
    let mut callee = connect(addr, "/ws").await;

    send_json(&mut caller, join("call-1", "caller")).await;
    send_json(&mut callee, join("call-1", "callee")).await;
    wait_for_size(&registry, "call-1", 2).await;

    send_json(&mut caller, chat("call-1", "alice", json!("hi"))).await;

    let expected = json!({ "type": "chat-message", "sender": "alice", "message": "hi" });
    assert_eq!(recv_json(&mut callee).await, expected);
    // The sender receives its own echo.
    assert_eq!(recv_json(&mut caller).await, expected);
}

#[tokio::test]
async fn root_path_accepts_upgrades() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/").await;

    send_json(&mut client, join("root-room", "solo")).await;
    wait_for_size(&registry, "root-room", 1).await;
    send_json(&mut client, chat("root-room", "me", json!({ "n": 1 }))).await;

    assert_eq!(recv_json(&mut client).await.get("message"), Some(&json!({ "n": 1 })));
}

#[tokio::test]
async fn disconnect_removes_member_and_empty_room() {
    let (addr, registry) = spawn_server().await;
    let mut stays = connect(addr, "/ws").await;
    let mut goes = connect(addr, "/ws").await;

    send_json(&mut stays, join("r", "a")).await;
    send_json(&mut goes, join("r", "b")).await;
    wait_for_size(&registry, "r", 2).await;

    let Ok(()) = goes.close(None).await else {
        panic!("close failed");
    };
    wait_for_size(&registry, "r", 1).await;

    drop(stays);
    wait_for_size(&registry, "r", 0).await;
    assert_eq!(registry.room_count().await, 0);
}

#[tokio::test]
async fn rooms_do_not_leak_into_each_other() {
    let (addr, registry) = spawn_server().await;
    let mut in_a = connect(addr, "/ws").await;
    let mut in_b = connect(addr, "/ws").await;

    send_json(&mut in_a, join("A", "x")).await;
    send_json(&mut in_b, join("B", "x")).await;
    wait_for_size(&registry, "A", 1).await;
    wait_for_size(&registry, "B", 1).await;

    send_json(&mut in_b, chat("B", "bob", json!("for B"))).await;
    assert_eq!(recv_json(&mut in_b).await.get("message"), Some(&json!("for B")));
    assert_silent(&mut in_a).await;
}

#[tokio::test]
async fn garbage_is_ignored_and_connection_survives() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    let Ok(()) = client.send(Message::text("definitely not json".to_string())).await else {
        panic!("send failed");
    };
    send_json(&mut client, json!({ "type": "leave-room", "roomId": "r" })).await;
    send_json(&mut client, json!({ "type": "join-room" })).await;
    assert_silent(&mut client).await;

    send_json(&mut client, join("r", "a")).await;
    wait_for_size(&registry, "r", 1).await;
    send_json(&mut client, chat("r", "a", json!("still here"))).await;
    assert_eq!(
        recv_json(&mut client).await.get("message"),
        Some(&json!("still here"))
    );
}

#[tokio::test]
async fn rejoin_moves_connection_between_rooms() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    send_json(&mut client, join("first", "a")).await;
    wait_for_size(&registry, "first", 1).await;
    send_json(&mut client, join("second", "a")).await;
    wait_for_size(&registry, "second", 1).await;

    assert_eq!(registry.room_size(&RoomId::from("first")).await, 0);
    assert_eq!(registry.room_count().await, 1);
}

#[tokio::test]
async fn sequential_broadcasts_arrive_in_order() {
    let (addr, registry) = spawn_server().await;
    let mut sender = connect(addr, "/ws").await;
    let mut receiver = connect(addr, "/ws").await;

    send_json(&mut sender, join("ordered", "a")).await;
    send_json(&mut receiver, join("ordered", "b")).await;
    wait_for_size(&registry, "ordered", 2).await;

    for i in 0..20 {
        send_json(&mut sender, chat("ordered", "a", json!(i))).await;
    }
    for i in 0..20 {
        assert_eq!(recv_json(&mut receiver).await.get("message"), Some(&json!(i)));
    }
}

#[tokio::test]
async fn http_endpoints_respond() {
    let (addr, registry) = spawn_server().await;

    let Ok(response) = reqwest::get(format!("http://{addr}/")).await else {
        panic!("GET / failed");
    };
    assert!(response.status().is_success());
    let Ok(body) = response.text().await else {
        panic!("liveness body");
    };
    assert_eq!(body, "WebSocket chat server is running.");

    let mut client = connect(addr, "/ws").await;
    send_json(&mut client, join("sized", "a")).await;
    wait_for_size(&registry, "sized", 1).await;

    let Ok(response) = reqwest::get(format!("http://{addr}/api/v1/rooms/sized")).await else {
        panic!("GET room size failed");
    };
    let Ok(value) = response.json::<Value>().await else {
        panic!("room size body");
    };
    assert_eq!(value, json!({ "room_id": "sized", "size": 1 }));

    let Ok(response) = reqwest::get(format!("http://{addr}/api/v1/rooms/ghost-room")).await else {
        panic!("GET ghost room failed");
    };
    let Ok(value) = response.json::<Value>().await else {
        panic!("ghost room body");
    };
    assert_eq!(value.get("size"), Some(&json!(0)));
}

#[tokio::test]
async fn binary_frames_are_handled_like_text() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    let frame = Message::binary(join("bin", "a").to_string().into_bytes());
    let Ok(()) = client.send(frame).await else {
        panic!("send failed");
    };
    wait_for_size(&registry, "bin", 1).await;

    let frame = Message::binary(chat("bin", "a", json!("bytes")).to_string().into_bytes());
    let Ok(()) = client.send(frame).await else {
        panic!("send failed");
    };
    assert_eq!(
        recv_json(&mut client).await,
        json!({ "type": "chat-message", "sender": "a", "message": "bytes" })
    );
}

#[tokio::test]
async fn non_utf8_binary_frame_is_dropped() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    let Ok(()) = client.send(Message::binary(vec![0xff, 0xfe, 0xfd])).await else {
        panic!("send failed");
    };
    assert_silent(&mut client).await;
    assert_eq!(registry.room_count().await, 0);

    send_json(&mut client, join("after-junk", "a")).await;
    wait_for_size(&registry, "after-junk", 1).await;
    send_json(&mut client, chat("after-junk", "a", json!("ok"))).await;
    assert_eq!(recv_json(&mut client).await.get("message"), Some(&json!("ok")));
}

#[tokio::test]
async fn sender_and_message_are_relayed_verbatim() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    send_json(&mut client, json!({ "type": "join-room", "roomId": "raw" })).await;
    wait_for_size(&registry, "raw", 1).await;

    send_json(
        &mut client,
        json!({ "type": "chat-message", "roomId": "raw", "sender": 42 }),
    )
    .await;
    assert_eq!(
        recv_json(&mut client).await,
        json!({ "type": "chat-message", "sender": 42 })
    );

    send_json(
        &mut client,
        json!({ "type": "chat-message", "roomId": "raw", "sender": ["a"], "message": null }),
    )
    .await;
    assert_eq!(
        recv_json(&mut client).await,
        json!({ "type": "chat-message", "sender": ["a"], "message": null })
    );
}

#[tokio::test]
async fn client_close_completes_handshake() {
    let (addr, registry) = spawn_server().await;
    let mut client = connect(addr, "/ws").await;

    send_json(&mut client, join("closing", "a")).await;
    wait_for_size(&registry, "closing", 1).await;

    let Ok(()) = client.close(None).await else {
        panic!("close failed");
    };
    loop {
        let Ok(next) = tokio::time::timeout(WAIT, client.next()).await else {
            panic!("server never finished the close handshake");
        };
        match next {
            None => break,
            Some(Ok(_)) => {}
            Some(Err(e)) => panic!("connection dropped without close reply: {e}"),
        }
    }
    wait_for_size(&registry, "closing", 0).await;
}
