use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pictior_rs::AppState;

const DEFAULT_PORT: u16 = 3002;

fn listen_port() -> u16 {
    match std::env::var("PORT") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid PORT value {:?}, falling back to {}", value, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pictior_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();
    let app = pictior_rs::app(state);

    let port = listen_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🎮 Pictior WebSocket server running on port {}", port);
    tracing::info!("   Health check: http://localhost:{}/health", port);
    tracing::info!("   WebSocket URL: ws://localhost:{}/room/<code>", port);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
