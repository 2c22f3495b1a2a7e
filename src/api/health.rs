//! Health check, statistics, and metrics endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::metrics::encode_metrics;
use crate::relay::RelayStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sessions: SessionHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionHealthResponse {
    pub registered: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub sessions: SessionStats,
    pub relay: RelayStatsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct SessionStats {
    pub registered: usize,
    pub identities: Vec<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let registered = state.registry.len().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        sessions: SessionHealthResponse { registered },
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let sessions = state.registry.snapshot().await;
    let identities = sessions.iter().map(|s| s.identity.clone()).collect();

    Json(StatsResponse {
        sessions: SessionStats {
            registered: sessions.len(),
            identities,
        },
        relay: state.relay.stats(),
    })
}

/// Prometheus text exposition.
pub async fn metrics() -> Result<String, StatusCode> {
    encode_metrics().map_err(|e| {
        tracing::error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
