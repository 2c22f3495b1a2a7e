use axum::{routing::get, Router};

use crate::server::AppState;

use super::health::{health, metrics, stats};
use super::sessions::{get_session, list_sessions};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(metrics))
        // Session endpoints
        .nest(
            "/api/v1",
            Router::new()
                .route("/sessions", get(list_sessions))
                .route("/sessions/{identity}", get(get_session)),
        )
}
