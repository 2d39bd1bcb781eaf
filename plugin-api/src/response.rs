//! Uniform response envelope.
//!
//! Every dispatch returns a [`Response`]. The envelope invariant is:
//! `success == false ⇔ kind == ResponseType::Error ⇔ error.is_some()`.
//! The constructors are the only way this crate builds responses, and each
//! one produces an envelope that satisfies the invariant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of response kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// An action was performed and acknowledged
    Confirmation,

    /// The dispatch failed
    Error,

    /// Structured payload in `data` is the primary result
    Data,

    /// Free-form text answer
    Text,

    /// The plugin requests a follow-up action from the caller
    Action,

    /// Long-running operation progress report
    Progress,
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseType::Confirmation => write!(f, "confirmation"),
            ResponseType::Error => write!(f, "error"),
            ResponseType::Data => write!(f, "data"),
            ResponseType::Text => write!(f, "text"),
            ResponseType::Action => write!(f, "action"),
            ResponseType::Progress => write!(f, "progress"),
        }
    }
}

/// The uniform contract every `handle_intent` call must return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Echoes the request id from the dispatch context
    pub request_id: String,

    /// Whether the dispatch succeeded
    pub success: bool,

    /// Response kind; `Error` if and only if `success` is false
    #[serde(rename = "type")]
    pub kind: ResponseType,

    /// Human-readable message
    pub content: String,

    /// Optional structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Error message, present if and only if `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Successful confirmation of a performed action.
    pub fn confirmation(request_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::success_with(request_id, ResponseType::Confirmation, content, None)
    }

    /// Successful free-form text answer.
    pub fn text(request_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::success_with(request_id, ResponseType::Text, content, None)
    }

    /// Successful response whose primary result is structured data.
    pub fn data(
        request_id: impl Into<String>,
        content: impl Into<String>,
        data: Value,
    ) -> Self {
        Self::success_with(request_id, ResponseType::Data, content, Some(data))
    }

    /// Failed dispatch. `content` and `error` carry the same message so the
    /// caller can render either field.
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            request_id: request_id.into(),
            success: false,
            kind: ResponseType::Error,
            content: message.clone(),
            data: None,
            error: Some(message),
        }
    }

    fn success_with(
        request_id: impl Into<String>,
        kind: ResponseType,
        content: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            success: true,
            kind,
            content: content.into(),
            data,
            error: None,
        }
    }

    /// Attach a structured payload to a successful response.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Check the envelope invariant. Used by the router as a debug assertion
    /// on plugin-produced envelopes.
    pub fn is_well_formed(&self) -> bool {
        let failed = !self.success;
        failed == (self.kind == ResponseType::Error) && failed == self.error.is_some()
    }
}
