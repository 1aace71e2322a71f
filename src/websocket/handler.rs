use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::connection::ConnectionHandle;
use crate::protocol::Envelope;
use crate::{router, status, AppState};

/// `/room/:room_code`: WebSocket upgrade for game connections, plain-HTTP
/// room lookup otherwise.
pub async fn room_handler(
    ws: Option<WebSocketUpgrade>,
    Path(room_code): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Some(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, state, room_code))
            .into_response(),
        None => status::room_info(&state, &room_code).await.into_response(),
    }
}

/// `/room` with no code: accept the upgrade, then close immediately with a
/// policy-violation code. The only connection-level input validation there is.
pub async fn missing_room_code(ws: Option<WebSocketUpgrade>) -> Response {
    match ws {
        Some(ws) => ws
            .on_upgrade(|mut socket| async move {
                tracing::warn!("Rejecting connection with empty room code");
                let _ = socket
                    .send(Message::Close(Some(CloseFrame {
                        code: close_code::POLICY,
                        reason: "Invalid room code".into(),
                    })))
                    .await;
            })
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Drive one game connection: register it, pump outgoing frames from the
/// registry channel, feed inbound envelopes to the router, clean up on close.
async fn handle_socket(socket: WebSocket, state: AppState, room_code: String) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let player_id = {
        let mut connections = state.connections.write().await;
        connections.register(ConnectionHandle::new(room_code.clone(), tx))
    };
    {
        // Rooms are created lazily at accept time, before any join envelope.
        let mut rooms = state.rooms.write().await;
        rooms.get_or_create(&room_code);
    }

    tracing::info!("Player {} connected to room {}", player_id, room_code);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match Envelope::from_json(&text) {
                Ok(envelope) => {
                    let mut rooms = state.rooms.write().await;
                    let connections = state.connections.read().await;
                    router::dispatch(&mut rooms, &connections, &room_code, &player_id, envelope);
                }
                Err(e) => {
                    tracing::warn!("Dropping malformed message from {}: {}", player_id, e);
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("Player {} disconnected", player_id);
                break;
            }
            Ok(_) => {
                // Ignore binary, ping and pong frames.
            }
            Err(e) => {
                tracing::warn!("WebSocket error for player {}: {}", player_id, e);
                break;
            }
        }
    }

    cleanup_connection(&state, &player_id).await;

    send_task.abort();
}

/// Drop the connection and remove the player from its room, notifying the
/// players that remain.
async fn cleanup_connection(state: &AppState, player_id: &str) {
    let handle = {
        let mut connections = state.connections.write().await;
        connections.unregister(player_id)
    };
    let Some(handle) = handle else {
        return;
    };

    let mut rooms = state.rooms.write().await;
    let connections = state.connections.read().await;
    router::handle_disconnect(&mut rooms, &connections, &handle.room_code, player_id);
    tracing::info!(
        "Player {} removed from room {}. Remaining players: {}",
        player_id,
        handle.room_code,
        rooms.get(&handle.room_code).map_or(0, |r| r.player_count())
    );
}
