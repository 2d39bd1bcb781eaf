//! # Zeeky Kernel
//!
//! Intent routing and plugin lifecycle core for the Zeeky voice assistant.
//!
//! The kernel boots a fixed set of lifecycle-managed subsystems (security,
//! AI, plugins, integrations) and delegates user intents to a registry of
//! independently developed plugins. Dispatch is bounded by a uniform
//! request/response contract defined in `zeeky-plugin-api`.
//!
//! ```text
//! request ──▶ NLU (AiManager) ──▶ IntentRouter ──▶ PluginRegistry ──▶ Plugin
//!                                      │                                │
//!                                      ◀──────── Response envelope ◀────┘
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod nlu;
pub mod plugin;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use core::{CoreError, Manager, ZeekyCore};
pub use errors::app_error::{AppError, AppResult};
pub use plugin::{IntentRouter, PluginManager, PluginRegistry, RegistryError};
pub use state::AppState;
