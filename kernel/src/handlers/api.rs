//! Kernel status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the server is answering
    pub status: &'static str,
    /// Kernel crate version
    pub version: &'static str,
    /// Core lifecycle state
    pub core_state: String,
    /// Seconds since the process started serving
    pub uptime_seconds: u64,
    /// Number of registered plugins
    pub plugin_count: usize,
}

/// Liveness probe with basic kernel status.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        core_state: state.core.state().to_string(),
        uptime_seconds: state.uptime_seconds(),
        plugin_count: state.registry.plugin_count(),
    })
}
