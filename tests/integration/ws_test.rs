//! Integration tests for the WebSocket event stream.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use loglens_core::events::ProcessingEvent;

use crate::helpers::TestApp;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn serve(app: &TestApp) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local addr");
    let router = app.router.clone();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    (addr, handle)
}

async fn next_json(socket: &mut WsStream) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("Timed out waiting for WebSocket message")
            .expect("WebSocket closed")
            .expect("WebSocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("Invalid JSON frame");
        }
    }
}

#[tokio::test]
async fn test_ws_greets_on_connect() {
    let app = TestApp::new().await;
    let (addr, server) = serve(&app).await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("WebSocket connect failed");

    let greeting = next_json(&mut socket).await;
    assert_eq!(greeting.get("kind").and_then(Value::as_str), Some("success"));

    server.abort();
}

#[tokio::test]
async fn test_ws_receives_published_events() {
    let app = TestApp::new().await;
    let (addr, server) = serve(&app).await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("WebSocket connect failed");
    let _greeting = next_json(&mut socket).await;

    app.state
        .bus
        .publish(&ProcessingEvent::info("Job abc is waiting to be processed").with_progress(0));

    let event = next_json(&mut socket).await;
    assert_eq!(event.get("kind").and_then(Value::as_str), Some("info"));
    assert!(
        event
            .get("message")
            .and_then(Value::as_str)
            .unwrap()
            .contains("waiting")
    );
    assert_eq!(event.get("progress").and_then(Value::as_i64), Some(0));

    server.abort();
}

#[tokio::test]
async fn test_ws_unsubscribes_on_disconnect() {
    let app = TestApp::new().await;
    let (addr, server) = serve(&app).await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("WebSocket connect failed");
    let _greeting = next_json(&mut socket).await;
    assert_eq!(app.state.bus.subscriber_count(), 1);

    socket
        .close(None)
        .await
        .expect("Failed to close WebSocket");

    for _ in 0..100 {
        if app.state.bus.subscriber_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(app.state.bus.subscriber_count(), 0);

    server.abort();
}
