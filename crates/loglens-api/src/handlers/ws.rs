//! WebSocket endpoint streaming processing events to clients.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use loglens_core::events::ProcessingEvent;
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn ws_events(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let subscription = state.bus.subscribe();
    let subscriber_id = subscription.id;
    let mut events = subscription.receiver;
    debug!(%subscriber_id, "WebSocket client connected");

    let (mut sink, mut stream) = socket.split();

    let greeting = ProcessingEvent::success("Connected to processing event stream");
    if let Ok(text) = serde_json::to_string(&greeting)
        && sink.send(Message::Text(text.into())).await.is_err()
    {
        state.bus.unsubscribe(subscriber_id);
        return;
    }

    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "Failed to serialize processing event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain the read side so close frames and pings are handled.
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    state.bus.unsubscribe(subscriber_id);
    forwarder.abort();
    debug!(%subscriber_id, "WebSocket client disconnected");
}
