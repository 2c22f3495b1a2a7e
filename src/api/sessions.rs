//! Session inspection endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::registry::SessionHandle;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionHandle>,
    pub total: usize,
}

/// GET /api/v1/sessions - List all registered sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let sessions = state.registry.snapshot().await;
    let total = sessions.len();

    Json(SessionListResponse { sessions, total })
}

/// GET /api/v1/sessions/{identity} - Get one session by identity
pub async fn get_session(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<SessionHandle>> {
    match state.registry.get(&identity).await {
        Some(session) => Ok(Json(session)),
        None => Err(AppError::NotFound(format!(
            "No registered session for identity '{}'",
            identity
        ))),
    }
}
