pub mod connection;
pub mod error;
pub mod game;
pub mod protocol;
pub mod room;
pub mod router;
pub mod status;
pub mod websocket;

use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Router};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use connection::ConnectionRegistry;
use room::RoomDirectory;

/// Application state shared across all connections: the two process-wide
/// repositories plus the start instant for uptime reporting.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<RoomDirectory>>,
    pub connections: Arc<RwLock<ConnectionRegistry>>,
    pub started_at: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(RoomDirectory::new())),
            connections: Arc::new(RwLock::new(ConnectionRegistry::new())),
            started_at: Instant::now(),
        }
    }
}

/// Build the full application router. Any origin may connect; TLS is a
/// fronting proxy's responsibility.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
        .route("/room", get(websocket::handler::missing_room_code))
        .route("/room/", get(websocket::handler::missing_room_code))
        .route("/room/:room_code", get(websocket::handler::room_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
