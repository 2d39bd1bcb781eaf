//! Plugin Discovery REST Endpoints
//!
//! # Endpoints
//!
//! - `GET /plugins` - List all registered plugins with metadata
//! - `GET /plugins/{id}` - Get a specific plugin
//! - `GET /plugins/{id}/health` - Get plugin health status

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::plugin::{PluginDescriptor, PluginMetrics};
use crate::state::AppState;

/// Response for GET /plugins
#[derive(Debug, Serialize)]
pub struct PluginListResponse {
    /// Registered plugins, in registration order
    pub plugins: Vec<PluginInfo>,
    /// Total count
    pub total_count: usize,
}

/// Plugin information for discovery
#[derive(Debug, Serialize)]
pub struct PluginInfo {
    /// Plugin identifier (e.g., "smart-home")
    pub id: String,
    /// Display name
    pub name: String,
    /// Version string
    pub version: String,
    /// Author or organization
    pub author: String,
    /// Brief description
    pub description: String,
    /// Intent names this plugin owns
    pub intents: Vec<String>,
    /// Current lifecycle state
    pub state: String,
    /// Usage metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PluginMetrics>,
}

/// Health status response for GET /plugins/{id}/health
#[derive(Debug, Serialize)]
pub struct PluginHealthResponse {
    /// Plugin ID
    pub id: String,
    /// Health status: healthy, degraded or unhealthy
    pub health: String,
    /// Usage metrics
    pub metrics: PluginMetrics,
}

/// List all registered plugins in registration order.
pub async fn list_plugins(State(state): State<Arc<AppState>>) -> Json<PluginListResponse> {
    let plugins: Vec<PluginInfo> = state
        .registry
        .list()
        .into_iter()
        .map(|descriptor| plugin_info(&state, &descriptor))
        .collect();

    let total_count = plugins.len();
    Json(PluginListResponse {
        plugins,
        total_count,
    })
}

/// Get a specific plugin by ID.
pub async fn get_plugin(
    State(state): State<Arc<AppState>>,
    Path(plugin_id): Path<String>,
) -> AppResult<Json<PluginInfo>> {
    let descriptor = state
        .registry
        .get(&plugin_id)
        .ok_or_else(|| AppError::NotFound(format!("no plugin with id '{plugin_id}'")))?;
    Ok(Json(plugin_info(&state, &descriptor)))
}

fn plugin_info(state: &AppState, descriptor: &PluginDescriptor) -> PluginInfo {
    let lifecycle_state = state
        .registry
        .state(&descriptor.id)
        .map(|s| s.to_string())
        .unwrap_or_default();

    PluginInfo {
        id: descriptor.id.clone(),
        name: descriptor.manifest.name.clone(),
        version: descriptor.manifest.version.to_string(),
        author: descriptor.manifest.author.clone(),
        description: descriptor.manifest.description.clone(),
        intents: descriptor.intents.clone(),
        state: lifecycle_state,
        metrics: state.registry.metrics(&descriptor.id),
    }
}

/// Get plugin health status.
///
/// Health is derived from the error rate: above 0.5 is unhealthy, above
/// 0.1 is degraded, otherwise healthy.
pub async fn get_plugin_health(
    State(state): State<Arc<AppState>>,
    Path(plugin_id): Path<String>,
) -> AppResult<Json<PluginHealthResponse>> {
    let metrics = state
        .registry
        .metrics(&plugin_id)
        .ok_or_else(|| AppError::NotFound(format!("no plugin with id '{plugin_id}'")))?;

    let health = if metrics.error_rate > 0.5 {
        "unhealthy"
    } else if metrics.error_rate > 0.1 {
        "degraded"
    } else {
        "healthy"
    };

    Ok(Json(PluginHealthResponse {
        id: plugin_id,
        health: health.to_string(),
        metrics,
    }))
}
