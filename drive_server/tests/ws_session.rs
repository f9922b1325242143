mod support;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect() -> Socket {
    let base_url = support::ensure_server();
    let ws_url = format!("{}/ws", base_url.replacen("http://", "ws://", 1));
    let (socket, _response) = connect_async(ws_url).await.expect("ws connect");
    socket
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("message before timeout")
            .expect("stream open")
            .expect("valid frame");
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().expect("text")).expect("json message");
        }
    }
}

async fn next_of_type(socket: &mut Socket, kind: &str) -> Value {
    loop {
        let value = next_json(socket).await;
        if value["type"] == kind {
            return value;
        }
    }
}

#[tokio::test]
async fn test_connect_receives_waypoints_then_sync() {
    let mut socket = connect().await;

    let first = next_json(&mut socket).await;
    assert_eq!(first["type"], "Waypoints");
    assert_eq!(first["data"][0]["title"], "Bimhuis");

    let second = next_json(&mut socket).await;
    assert_eq!(second["type"], "Sync");
    assert!(second["data"]["pose"]["heading"].is_i64());
    assert!(second["data"]["overlays"]["help"].is_boolean());
}

#[tokio::test]
async fn test_rejected_jump_answers_with_error() {
    let mut socket = connect().await;

    let payload = json!({
        "type": "Jump",
        "data": { "lat": "north", "lng": "4.9", "heading": "90" }
    });
    socket
        .send(Message::text(payload.to_string()))
        .await
        .expect("send jump");

    let error = next_of_type(&mut socket, "Error").await;
    assert!(
        error["data"]["message"]
            .as_str()
            .is_some_and(|message| message.contains("latitude"))
    );
}

#[tokio::test]
async fn test_map_init_broadcasts_widget_options() {
    let mut socket = connect().await;

    socket
        .send(Message::text(json!({ "type": "InitMap" }).to_string()))
        .await
        .expect("send init");

    let init = next_of_type(&mut socket, "MapInit").await;
    assert_eq!(init["data"]["zoom"], 20);
    assert_eq!(init["data"]["tilt"], 60);
    assert_eq!(init["data"]["mapTypeId"], "satellite");
}

#[tokio::test]
async fn test_binary_frames_close_the_socket() {
    let mut socket = connect().await;

    socket
        .send(Message::binary(vec![1u8, 2, 3]))
        .await
        .expect("send binary");

    loop {
        let msg = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("close before timeout");
        match msg {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(u16::from(frame.code), 1003);
                break;
            }
            Some(Ok(Message::Close(None))) | None | Some(Err(_)) => {
                panic!("expected a close frame with a reason")
            }
            Some(Ok(_)) => continue,
        }
    }
}

#[tokio::test]
async fn test_repeated_invalid_json_closes_with_policy() {
    let mut socket = connect().await;

    // Ten bad messages are tolerated; the eleventh closes the socket.
    for _ in 0..11 {
        socket
            .send(Message::text("garbage"))
            .await
            .expect("send invalid json");
    }

    loop {
        let msg = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("close before timeout");
        match msg {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(u16::from(frame.code), 1008);
                assert_eq!(&*frame.reason, "too many invalid messages");
                break;
            }
            Some(Ok(Message::Close(None))) | None | Some(Err(_)) => {
                panic!("expected a close frame with a reason")
            }
            Some(Ok(_)) => continue,
        }
    }
}
