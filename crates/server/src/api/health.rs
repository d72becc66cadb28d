use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::schemas::HealthResponse;

/// `GET /api/health` -- returns service status.
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "active".into(),
    };
    (StatusCode::OK, Json(body))
}

/// `GET /api/metrics` -- returns workflow counters as JSON.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.workflow.metrics();
    (StatusCode::OK, Json(snap))
}
