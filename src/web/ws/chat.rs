//! Chat WebSocket handler.
//!
//! One task per connection: inbound frames are applied to the hub in the
//! order they arrive, and hub updates are forwarded to the socket.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::chat::ChatHub;

use super::messages::{ClientMessage, ServerMessage};

/// WebSocket chat handler.
///
/// GET /api/chat/ws
pub async fn chat_ws_handler(ws: WebSocketUpgrade, State(hub): State<Arc<ChatHub>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, hub: Arc<ChatHub>) {
    let mut connection = hub.connect();
    let connection_id = connection.id.clone();

    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&hub, &connection_id, &text).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(connection_id = %connection_id, "WebSocket closed by client");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %connection_id, "WebSocket error: {}", e);
                        break;
                    }
                }
            }

            update = connection.events.recv() => {
                match update {
                    Ok(event) => {
                        let server_msg = ServerMessage::from(event);
                        match serde_json::to_string(&server_msg) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to serialize server message: {}", e);
                            }
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            connection_id = %connection_id,
                            skipped,
                            "Connection fell behind, dropped chat updates"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    hub.disconnect(&connection_id).await;
    tracing::debug!(connection_id = %connection_id, "WebSocket session ended");
}

/// Apply a client text frame to the hub.
///
/// Frames that cannot be decoded are dropped; the protocol has no error
/// channel back to the sender.
async fn handle_client_message(hub: &ChatHub, connection_id: &str, text: &str) {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::JoinChat(request)) => {
            hub.join(connection_id, request).await;
        }
        Ok(ClientMessage::SendMessage(request)) => {
            hub.send_message(connection_id, request).await;
        }
        Err(e) => {
            tracing::debug!(connection_id, "Ignoring undecodable frame: {}", e);
        }
    }
}
