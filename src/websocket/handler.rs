//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::routes::dashboard::apply_selection;
use crate::api::AppState;

/// WebSocket upgrade handler
///
/// Upgrades the HTTP connection and starts pushing dashboard views.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let hub = Arc::clone(&state.ws_hub);

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting WebSocket connection");
            if let Some(msg) = encode(&ServerMessage::Error {
                message: e.to_string(),
            }) {
                let _ = sender.send(msg).await;
            }
            return;
        }
    };

    // Greeting first, then the current view so the client can render immediately.
    let greeting = [
        ServerMessage::Connected {
            connection_id: connection_id.clone(),
        },
        ServerMessage::View(state.dashboard.view()),
    ];
    for message in &greeting {
        let Some(msg) = encode(message) else { continue };
        if sender.send(msg).await.is_err() {
            tracing::debug!(connection_id = %connection_id, "Client went away during handshake");
            hub.unregister(&connection_id).await;
            return;
        }
    }

    let conn_id_for_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Some(msg) = encode(&message) else { continue };
            if sender.send(msg).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let state_for_recv = Arc::clone(&state);
    let conn_id_for_recv = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&state_for_recv, &conn_id_for_recv, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unregister(&connection_id).await;
}

/// Handle a received WebSocket frame
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(state: &AppState, connection_id: &str, message: Message) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_client_message(state, connection_id, client_msg).await,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Invalid client message"
                    );
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = state.ws_hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = state.ws_hub.send_to(connection_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
///
/// A successful selection is not echoed here; the resulting view reaches
/// every client through the hub broadcast.
async fn handle_client_message(state: &AppState, connection_id: &str, message: ClientMessage) {
    match message {
        ClientMessage::Select(request) => {
            if let Err(e) = apply_selection(&state.dashboard, request).await {
                tracing::debug!(connection_id = %connection_id, error = %e, "Selection rejected");
                let error_msg = ServerMessage::Error {
                    message: e.to_string(),
                };
                let _ = state.ws_hub.send_to(connection_id, error_msg).await;
            }
        }
        ClientMessage::Ping => {
            let _ = state.ws_hub.send_to(connection_id, ServerMessage::Pong).await;
        }
    }
}
