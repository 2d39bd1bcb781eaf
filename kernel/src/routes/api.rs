use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, intent, plugins};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// Note: CORS is applied in main.rs once the configuration is available
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(api::health_check))
        .route("/intent", post(intent::process_intent))
        .route("/dispatch", post(intent::dispatch))
        .route("/plugins", get(plugins::list_plugins))
        .route("/plugins/{id}", get(plugins::get_plugin))
        .route("/plugins/{id}/health", get(plugins::get_plugin_health))
        .layer(TraceLayer::new_for_http())
}
