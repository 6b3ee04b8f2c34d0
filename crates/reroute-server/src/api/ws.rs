//! WebSocket snapshot stream.
//!
//! Each connection receives the current snapshot on connect, then one
//! message per engine state change.

use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before reading so no change between the two is lost
    let mut rx = state.tx.subscribe();

    let initial = match serde_json::to_string(&state.snapshot()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize initial snapshot: {}", e);
            return;
        }
    };
    if socket.send(Message::Text(initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            event = rx.recv() => {
                match event {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Only the newest snapshot matters
                        tracing::debug!("WebSocket subscriber lagged by {} snapshot(s)", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
