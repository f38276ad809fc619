// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use futures::StreamExt;
use serde_json::{Value, json};
use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Global address used by all tests after the server publishes its bound port.
static SERVER_ADDR: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return its `host:port`.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_addr = Arc::new(OnceLock::<String>::new());
        let published_addr_thread = Arc::clone(&published_addr);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_addr_thread.set(addr.to_string());
                gesture_arcade::run(listener).await.expect("server failed");
            });
        });
        wait_for_server_addr_and_readiness(published_addr);
    });

    SERVER_ADDR
        .get()
        .expect("server addr should be initialized")
        .as_str()
}

fn wait_for_server_addr_and_readiness(published_addr: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the address.
    let addr = loop {
        if let Some(addr) = published_addr.get() {
            break addr.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_ADDR.set(addr.clone());

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not become ready in time");
}

pub fn ws_url(query: &str) -> String {
    format!("ws://{}/ws{query}", ensure_server())
}

pub async fn connect(query: &str) -> WsStream {
    let (ws, _response) = tokio_tungstenite::connect_async(ws_url(query))
        .await
        .expect("websocket connect");
    ws
}

// Next text message as JSON, skipping control frames.
pub async fn next_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("server sends json");
        }
    }
}

// Reads messages until one matches, failing after a few seconds.
pub async fn wait_for(ws: &mut WsStream, pred: impl Fn(&Value) -> bool) -> Value {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let value = next_json(ws).await;
            if pred(&value) {
                return value;
            }
        }
    })
    .await
    .expect("expected message never arrived")
}

// Upright fist with the thumb pointing up, in detector coordinates.
pub fn thumbs_up_landmarks() -> Value {
    let mut points = vec![
        json!({"x": 0.5, "y": 0.9, "z": 0.0}),
        json!({"x": 0.45, "y": 0.8, "z": 0.0}),
        json!({"x": 0.40, "y": 0.7, "z": 0.0}),
        json!({"x": 0.35, "y": 0.55, "z": 0.0}),
        json!({"x": 0.35, "y": 0.45, "z": 0.0}),
    ];
    // mcp, pip, dip, tip per finger, curled back below the pip.
    for x in [0.42, 0.48, 0.54, 0.60] {
        for y in [0.6, 0.52, 0.58, 0.66] {
            points.push(json!({"x": x, "y": y, "z": 0.0}));
        }
    }
    Value::Array(points)
}

pub fn frame_message(landmarks: Value) -> Message {
    Message::text(json!({"type": "Frame", "data": {"landmarks": landmarks}}).to_string())
}

pub fn control_message(kind: &str) -> Message {
    Message::text(json!({"type": kind}).to_string())
}
