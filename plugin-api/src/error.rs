//! Plugin-side error taxonomy.

use thiserror::Error;

/// Errors a plugin (or the kernel on its behalf) can produce during
/// lifecycle operations or intent handling.
///
/// None of these escape the router: a `handle_intent` failure is translated
/// into an error [`Response`](crate::Response) at the dispatch boundary.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Intent handler failed
    #[error("{0}")]
    Execution(String),

    /// Plugin panicked during execution
    #[error("plugin panicked: {0}")]
    Panic(String),

    /// Plugin initialization failed
    #[error("plugin initialization failed: {0}")]
    InitializationFailed(String),

    /// Plugin configuration rejected
    #[error("plugin configuration error: {0}")]
    ConfigurationError(String),

    /// Operation called on a plugin that is not in a state that permits it,
    /// e.g. `handle_intent` before `initialize` completed
    #[error("lifecycle order violation for plugin '{plugin}': {detail}")]
    LifecycleOrder { plugin: String, detail: String },

    /// Dispatch exceeded its deadline
    #[error("plugin did not respond within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
}

impl PluginError {
    /// Shorthand for an execution failure.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}
