//! The plugin trait.

use async_trait::async_trait;

use crate::{ExecutionContext, Intent, PluginError, PluginManifest, Response};

/// Contract every Zeeky plugin implements.
///
/// The kernel drives the lifecycle: `initialize` is called once before any
/// dispatch, `cleanup` once during shutdown. `handle_intent` is only invoked
/// for intents the plugin declared via [`intents`](Plugin::intents), and only
/// while the plugin is running.
///
/// Methods take `&self`; plugins own their private state behind interior
/// mutability (`tokio::sync::Mutex`/`RwLock`) since concurrent dispatches to
/// the same plugin are not serialized by the router.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Static plugin metadata.
    fn manifest(&self) -> PluginManifest;

    /// Intent names this plugin owns. Must be stable across calls; the
    /// registry snapshots it at registration time.
    fn intents(&self) -> Vec<String>;

    /// One-time setup before the plugin starts receiving intents.
    ///
    /// Return an error to abort kernel startup.
    async fn initialize(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Handle one intent dispatch.
    ///
    /// Implementations should return `Ok` with an error envelope for
    /// domain-level failures ("no such device") and `Err` for programming or
    /// infrastructure failures; the router converts either into a
    /// well-formed envelope.
    async fn handle_intent(
        &self,
        intent: &Intent,
        ctx: &ExecutionContext,
    ) -> Result<Response, PluginError>;

    /// Release resources during shutdown. Best effort; errors are logged and
    /// do not stop the shutdown pass.
    async fn cleanup(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
