//! Read-only side-channel HTTP endpoints over the room directory and the
//! connection registry. Not part of the room protocol.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::AppState;

/// `GET /`: informational root endpoint.
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Pictior WebSocket server is running!",
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
    }))
}

/// `GET /health`: liveness probe with room and connection counts.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let rooms = state.rooms.read().await.room_count();
    let players = state.connections.read().await.connection_count();
    Json(json!({
        "status": "ok",
        "rooms": rooms,
        "players": players,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Plain-HTTP lookup of one room, used by the `/room/:room_code` route when
/// the request is not a WebSocket upgrade.
pub async fn room_info(state: &AppState, room_code: &str) -> Response {
    let rooms = state.rooms.read().await;
    match rooms.get(room_code) {
        Some(room) => Json(json!({
            "roomId": room_code,
            "playerCount": room.player_count(),
            "gameStatus": room.game_state.game_status,
            "currentRound": room.game_state.current_round,
            "totalRounds": room.game_state.total_rounds,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Room not found" }))).into_response(),
    }
}
