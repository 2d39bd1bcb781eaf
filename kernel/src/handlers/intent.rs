//! Intent processing endpoints.
//!
//! # Endpoints
//!
//! - `POST /intent` - Classify free text and dispatch the resulting intent
//! - `POST /dispatch` - Dispatch a pre-classified intent directly

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use zeeky_plugin_api::{ExecutionContext, Intent, Response};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Request body for POST /intent
#[derive(Debug, Deserialize)]
pub struct ProcessIntentRequest {
    /// Raw utterance to classify
    pub text: String,
    /// Caller-supplied request id; generated when absent or empty
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Response body for POST /intent
#[derive(Debug, Serialize)]
pub struct ProcessIntentResponse {
    /// The intent the classifier produced
    pub intent: Intent,
    /// The plugin's response envelope
    pub response: Response,
}

/// Request body for POST /dispatch
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    /// Pre-classified intent to dispatch
    pub intent: Intent,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Classify an utterance and route it to the owning plugin.
///
/// Plugin failures do not surface as HTTP errors: the router folds them
/// into the response envelope, so this endpoint returns 200 whenever the
/// request itself is well formed.
pub async fn process_intent(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessIntentRequest>,
) -> AppResult<Json<ProcessIntentResponse>> {
    if body.text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".into()));
    }

    let request_id = state.security.ensure_request_id(body.request_id)?;
    let intent = state.ai.analyze(&body.text);
    info!(request_id = %request_id, intent = %intent.name, "processing utterance");

    let ctx = build_context(
        request_id,
        body.user_id,
        body.session_id,
        body.device_id,
    );
    let response = state.router.route(&intent, &ctx).await;

    Ok(Json(ProcessIntentResponse { intent, response }))
}

/// Dispatch a pre-classified intent, bypassing the classifier.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DispatchRequest>,
) -> AppResult<Json<Response>> {
    if body.intent.name.trim().is_empty() {
        return Err(AppError::BadRequest("intent name must not be empty".into()));
    }

    let request_id = state.security.ensure_request_id(body.request_id)?;
    let ctx = build_context(
        request_id,
        body.user_id,
        body.session_id,
        body.device_id,
    );
    let response = state.router.route(&body.intent, &ctx).await;

    Ok(Json(response))
}

fn build_context(
    request_id: String,
    user_id: Option<String>,
    session_id: Option<String>,
    device_id: Option<String>,
) -> ExecutionContext {
    let mut ctx = ExecutionContext::new(request_id);
    ctx.user_id = user_id;
    ctx.session_id = session_id;
    ctx.device_id = device_id;
    ctx
}
