//! # Zeeky Plugin API
//!
//! This crate defines the contract between the Zeeky kernel and its plugins.
//! A plugin is an independently developed unit that owns a domain (smart home,
//! productivity, music, ...) and handles a fixed set of named intents.
//!
//! # Contract
//!
//! Every plugin implements [`Plugin`]: static metadata plus three async
//! operations (`initialize`, `handle_intent`, `cleanup`). The kernel never
//! inspects plugin internals beyond this trait.
//!
//! All dispatch results are carried in the uniform [`Response`] envelope.
//! The envelope invariant is load-bearing and enforced by the constructors:
//!
//! ```text
//! success == false  ⇔  kind == ResponseType::Error  ⇔  error.is_some()
//! ```
//!
//! # Example Plugin
//!
//! ```rust,ignore
//! use zeeky_plugin_api::prelude::*;
//!
//! struct LightsPlugin;
//!
//! #[async_trait]
//! impl Plugin for LightsPlugin {
//!     fn manifest(&self) -> PluginManifest {
//!         PluginManifest::new("lights", "Lights", "1.0.0")
//!     }
//!
//!     fn intents(&self) -> Vec<String> {
//!         vec!["turn_on".into(), "turn_off".into()]
//!     }
//!
//!     async fn handle_intent(
//!         &self,
//!         intent: &Intent,
//!         ctx: &ExecutionContext,
//!     ) -> Result<Response, PluginError> {
//!         match intent.name.as_str() {
//!             "turn_on" => Ok(Response::confirmation(&ctx.request_id, "Lights on.")),
//!             other => Err(PluginError::Execution(format!("unexpected intent {other}"))),
//!         }
//!     }
//! }
//! ```

mod context;
mod error;
mod intent;
mod manifest;
mod plugin;
mod response;

pub use context::{Conversation, ConversationTurn, ExecutionContext};
pub use error::PluginError;
pub use intent::{Entity, Intent};
pub use manifest::PluginManifest;
pub use plugin::Plugin;
pub use response::{Response, ResponseType};

/// Prelude for plugin development.
///
/// ```rust,ignore
/// use zeeky_plugin_api::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        Conversation, Entity, ExecutionContext, Intent, Plugin, PluginError, PluginManifest,
        Response, ResponseType,
    };

    // Re-export commonly needed external crates
    pub use async_trait::async_trait;
    pub use serde_json::Value;
    pub use std::sync::Arc;
}
