//! Shared application state for HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::core::ai::AiManager;
use crate::core::integration::IntegrationManager;
use crate::core::security::SecurityManager;
use crate::core::ZeekyCore;
use crate::plugin::{IntentRouter, PluginRegistry};

/// Everything the HTTP handlers need, shared behind an `Arc`.
pub struct AppState {
    pub config: ServerConfig,
    pub core: Arc<ZeekyCore>,
    pub registry: Arc<PluginRegistry>,
    pub router: IntentRouter,
    pub security: Arc<SecurityManager>,
    pub ai: Arc<AiManager>,
    pub integrations: Arc<IntegrationManager>,
    pub started_at: Instant,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ServerConfig,
        core: Arc<ZeekyCore>,
        registry: Arc<PluginRegistry>,
        router: IntentRouter,
        security: Arc<SecurityManager>,
        ai: Arc<AiManager>,
        integrations: Arc<IntegrationManager>,
    ) -> Self {
        Self {
            config,
            core,
            registry,
            router,
            security,
            ai,
            integrations,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the kernel process started serving.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
