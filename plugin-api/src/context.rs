//! Per-request execution context.
//!
//! The context is owned by the caller and passed by reference through the
//! router into the plugin. Its lifetime is a single dispatch call; plugins
//! must not retain it beyond the call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One turn of a conversation (user utterance or assistant reply).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// "user" or "assistant"
    pub role: String,

    /// Utterance text
    pub text: String,
}

/// Conversation state carried across dispatches by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<ConversationTurn>,

    /// Entities accumulated over the conversation, keyed by name
    #[serde(default)]
    pub entities: HashMap<String, Value>,
}

/// Per-request bag passed through the router into the plugin.
///
/// `request_id` must be echoed back in the [`Response`](crate::Response);
/// the router fills it in defensively if a plugin forgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Opaque request identifier, caller-supplied or generated
    pub request_id: String,

    /// Conversation state, when the caller tracks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<Conversation>,

    /// Identifier of the requesting user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Identifier of the user's session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Identifier of the originating device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl ExecutionContext {
    /// Create a context carrying only a request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            conversation: None,
            user_id: None,
            session_id: None,
            device_id: None,
        }
    }

    /// Set the user id.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the session id.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach conversation state.
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = Some(conversation);
        self
    }
}
