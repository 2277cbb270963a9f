//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub storage: String,
}

/// Liveness probe: always OK while the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: checks the submission store is reachable.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
                storage: "connected".to_string(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "Storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "degraded".to_string(),
                    storage: format!("error: {e}"),
                }),
            )
        }
    }
}
