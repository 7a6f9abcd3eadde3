#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use seekboard::lobby::seek::Seek;
use seekboard::messages::{ClientMessage, ServerMessage};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn lobby_url(&self) -> String {
        format!("{}/ws/lobby", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = seekboard::app(pool);
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

/// Connect and consume the initial lobby list
pub async fn connect_lobby(server: &TestServer) -> (WsStream, Vec<Seek>) {
    let (mut ws, _) = connect_async(&server.lobby_url())
        .await
        .expect("Failed to connect");
    let seeks = recv_seeks(&mut ws).await;
    (ws, seeks)
}

/// Connect as `username` and consume the lists sent on connect and on hello
pub async fn connect_as(server: &TestServer, username: &str) -> WsStream {
    let (mut ws, _) = connect_lobby(server).await;
    ws.send(hello_msg(Some(username))).await.unwrap();
    recv_seeks(&mut ws).await;
    ws
}

fn to_frame(msg: &ClientMessage) -> Message {
    let json = serde_json::to_string(msg).unwrap();
    Message::Text(json.into())
}

pub fn hello_msg(username: Option<&str>) -> Message {
    to_frame(&ClientMessage::Hello {
        username: username.map(str::to_string),
    })
}

pub fn add_seek_msg() -> Message {
    to_frame(&ClientMessage::AddSeek)
}

pub fn cancel_seek_msg(id: &str) -> Message {
    to_frame(&ClientMessage::CancelSeek { id: id.to_string() })
}

pub fn join_seek_msg(id: &str) -> Message {
    to_frame(&ClientMessage::JoinSeek { id: id.to_string() })
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = ws.next().await.unwrap().unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

pub async fn recv_seeks(ws: &mut WsStream) -> Vec<Seek> {
    match recv(ws).await {
        ServerMessage::Seeks { seeks } => seeks,
        other => panic!("Expected Seeks, got {:?}", other),
    }
}

/// Open a seek and wait for it to be published back
pub async fn add_seek(ws: &mut WsStream) -> Seek {
    ws.send(add_seek_msg()).await.unwrap();
    let seek = match recv(ws).await {
        ServerMessage::SeekCreated { seek } => seek,
        other => panic!("Expected SeekCreated, got {:?}", other),
    };
    recv_seeks(ws).await;
    seek
}
