pub mod lobby;
mod repository;

pub use lobby::messages;
pub use repository::RatingRepository;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use lobby::LobbyState;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<LobbyState>>) -> Response {
    ws.on_upgrade(|socket| lobby::handle_connection(socket, state))
}

pub fn app(pool: SqlitePool) -> Router {
    app_with_config(pool, None)
}

/// Build the router. `default_rating` applies to seeks of anonymous or unrated players.
pub fn app_with_config(pool: SqlitePool, default_rating: Option<u32>) -> Router {
    let ratings = RatingRepository::new(pool);
    let state = Arc::new(LobbyState::new(ratings, default_rating));

    Router::new()
        .route("/health", get(health))
        .route("/lobby/seeks", get(lobby::list_seeks))
        .route("/lobby/seeks/:id", get(lobby::get_seek))
        .route("/ws/lobby", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
