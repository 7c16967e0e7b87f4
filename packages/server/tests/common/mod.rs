//! Shared helpers for the server integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use merlinfest_server::ui::{AppState, Server};
use merlinfest_shared::time::SystemClock;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// In-process hub bound to an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let state = Arc::new(AppState::in_memory(Arc::new(SystemClock)));
        let handle = tokio::spawn(async move {
            let _ = Server::new(state).serve(listener).await;
        });

        TestServer { addr, handle }
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Open a WebSocket on `/ws`
    pub async fn connect(&self) -> WsStream {
        self.connect_to("/ws").await
    }

    pub async fn connect_to(&self, path: &str) -> WsStream {
        let (ws, _) = connect_async(self.ws_url(path))
            .await
            .expect("Failed to connect WebSocket");
        ws
    }

    /// Current live visual state via the debug endpoint
    pub async fn debug_state(&self) -> serde_json::Value {
        reqwest::get(self.http_url("/debug/state"))
            .await
            .expect("Failed to request debug state")
            .json()
            .await
            .expect("Debug state is not JSON")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Wait for the next JSON event frame.
pub async fn next_event(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for an event")
            .expect("WebSocket closed")
            .expect("WebSocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Event is not JSON");
        }
    }
}

/// Wait for the next event and check its name.
pub async fn expect_event(ws: &mut WsStream, name: &str) -> serde_json::Value {
    let event = next_event(ws).await;
    assert_eq!(event["event"], name, "unexpected event: {event}");
    event["data"].clone()
}

/// Assert that nothing arrives for a short while.
pub async fn assert_silent(ws: &mut WsStream) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(QUIET_PERIOD, ws.next()).await
    {
        panic!("expected no event, got {}", text.as_str());
    }
}

pub async fn send_event(ws: &mut WsStream, event: serde_json::Value) {
    ws.send(Message::text(event.to_string()))
        .await
        .expect("Failed to send event");
}

pub async fn send_raw(ws: &mut WsStream, text: &str) {
    ws.send(Message::text(text.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Connect a session and consume its initial-state and own count update.
pub async fn join(server: &TestServer) -> WsStream {
    let mut ws = server.connect().await;
    expect_event(&mut ws, "initial-state").await;
    expect_event(&mut ws, "user-count-update").await;
    ws
}
