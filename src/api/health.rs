//! Liveness and Prometheus exposition handlers.

use crate::api::{AppState, HealthResponse};
use axum::{extract::State, http::header, response::IntoResponse, Json};
use std::sync::Arc;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /api/health - Liveness and uptime.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Backend API is running",
        uptime_seconds: state.metrics_collector.uptime_seconds(),
    })
}

/// GET /metrics - Prometheus text format, rendered even before the first
/// recorded sample.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics_collector.render_metrics(),
    )
}
