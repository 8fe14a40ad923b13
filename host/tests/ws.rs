use clipboard_x_host::clipboard::MemoryClipboard;
use clipboard_x_host::{server, HostState};
use clipboard_x_protocol::{Command, Frame, CLIPBOARD_CHANGED};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_host() -> (String, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = HostState::new(
        std::sync::Arc::new(MemoryClipboard::new()),
        dir.path().join("images"),
        Duration::from_millis(10),
    );
    let (addr, serve) = server::bind(state, ([127, 0, 0, 1], 0).into()).unwrap();
    tokio::spawn(serve);
    (format!("ws://{}/ws", addr), dir)
}

async fn send(socket: &mut Socket, frame: Frame) {
    socket
        .send(Message::Text(frame.to_text().unwrap()))
        .await
        .unwrap();
}

async fn next_frame(socket: &mut Socket) -> Frame {
    loop {
        let msg = timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            return Frame::from_text(&text).unwrap();
        }
    }
}

async fn invoke(socket: &mut Socket, id: u64, cmd: Command, args: Value) -> Result<Value, String> {
    send(socket, Frame::invoke(id, cmd, args)).await;
    loop {
        if let Some((reply_id, outcome)) = next_frame(socket).await.into_reply() {
            assert_eq!(reply_id, id);
            return outcome;
        }
    }
}

#[tokio::test]
async fn commands_round_trip_over_websocket() {
    let (url, _dir) = start_host().await;
    let (mut socket, _) = connect_async(url.as_str()).await.unwrap();

    assert_eq!(
        invoke(&mut socket, 1, Command::HasText, Value::Null).await,
        Ok(json!(false))
    );
    assert_eq!(
        invoke(&mut socket, 2, Command::WriteText, json!({"text": "Hello, world!"})).await,
        Ok(Value::Null)
    );
    assert_eq!(
        invoke(&mut socket, 3, Command::ReadText, Value::Null).await,
        Ok(json!("Hello, world!"))
    );
    assert_eq!(
        invoke(&mut socket, 4, Command::ReadHtml, Value::Null).await,
        Err("clipboard does not contain html".to_string())
    );
}

#[tokio::test]
async fn unknown_command_gets_error_reply() {
    let (url, _dir) = start_host().await;
    let (mut socket, _) = connect_async(url.as_str()).await.unwrap();

    let raw = json!({"kind": "invoke", "id": 9, "cmd": "plugin:clipboard-x|paste_everything"});
    socket
        .send(Message::Text(raw.to_string()))
        .await
        .unwrap();

    let (id, outcome) = next_frame(&mut socket).await.into_reply().unwrap();
    assert_eq!(id, 9);
    assert_eq!(
        outcome,
        Err("unknown command: plugin:clipboard-x|paste_everything".to_string())
    );
}

#[tokio::test]
async fn change_event_reaches_every_client() {
    let (url, _dir) = start_host().await;
    let (mut writer, _) = connect_async(url.as_str()).await.unwrap();
    let (mut observer, _) = connect_async(url.as_str()).await.unwrap();

    invoke(&mut writer, 1, Command::StartListening, Value::Null)
        .await
        .unwrap();
    // Give the watcher a moment to take its first fingerprint.
    tokio::time::sleep(Duration::from_millis(50)).await;

    invoke(&mut writer, 2, Command::WriteText, json!({"text": "changed"}))
        .await
        .unwrap();

    assert_eq!(next_frame(&mut observer).await, Frame::event(CLIPBOARD_CHANGED));
}
