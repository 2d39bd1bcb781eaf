//! Plugin Manager
//!
//! Owns the registered plugins as one logical lifecycle unit, independent of
//! the intent router. Startup is sequential in registration order and fails
//! fast; shutdown is sequential in reverse order and best effort.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;

use zeeky_plugin_api::PluginError;

use super::isolation::call_plugin_safely_async;
use super::lifecycle::LifecycleState;
use super::registry::{PluginDescriptor, PluginRegistry};
use crate::core::Manager;

/// Lifecycle aggregation over all registered plugins.
pub struct PluginManager {
    registry: Arc<PluginRegistry>,
}

impl PluginManager {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this manager drives.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    async fn initialize_plugin(&self, descriptor: &PluginDescriptor) -> Result<(), PluginError> {
        self.registry
            .set_state(&descriptor.id, LifecycleState::Starting);

        let plugin = descriptor.plugin.clone();
        let result =
            call_plugin_safely_async(AssertUnwindSafe(|| async { plugin.initialize().await }))
                .await;

        match &result {
            Ok(()) => {
                self.registry
                    .set_state(&descriptor.id, LifecycleState::Running);
                tracing::info!(plugin_id = %descriptor.id, "Plugin initialized");
            }
            Err(err) => {
                self.registry
                    .set_state(&descriptor.id, LifecycleState::Failed);
                self.registry.record_error(&descriptor.id, err.to_string());
                tracing::error!(
                    plugin_id = %descriptor.id,
                    error = %err,
                    "Plugin initialization failed"
                );
            }
        }

        result
    }

    async fn cleanup_plugin(&self, descriptor: &PluginDescriptor) -> Result<(), PluginError> {
        self.registry
            .set_state(&descriptor.id, LifecycleState::Stopping);

        let plugin = descriptor.plugin.clone();
        let result =
            call_plugin_safely_async(AssertUnwindSafe(|| async { plugin.cleanup().await })).await;

        // Best effort: the plugin is considered stopped even when cleanup
        // failed, so a misbehaving plugin cannot wedge the shutdown sequence
        self.registry
            .set_state(&descriptor.id, LifecycleState::Stopped);

        if let Err(err) = &result {
            self.registry.record_error(&descriptor.id, err.to_string());
            tracing::error!(
                plugin_id = %descriptor.id,
                error = %err,
                "Plugin cleanup failed, continuing shutdown"
            );
        } else {
            tracing::info!(plugin_id = %descriptor.id, "Plugin stopped");
        }

        result
    }

    /// Stop the given plugins in reverse order, continuing past failures.
    /// Returns the first error encountered, if any.
    async fn stop_in_reverse(&self, started: &[PluginDescriptor]) -> Option<PluginError> {
        let mut first_error = None;
        for descriptor in started.iter().rev() {
            if let Err(err) = self.cleanup_plugin(descriptor).await {
                first_error.get_or_insert(err);
            }
        }
        first_error
    }
}

#[async_trait]
impl Manager for PluginManager {
    fn name(&self) -> &'static str {
        "plugins"
    }

    /// Initialize all plugins sequentially in registration order.
    ///
    /// Sequential on purpose: init order can matter (shared storage setup),
    /// so plugins are not started in parallel even though a hanging
    /// `initialize` then blocks the whole boot. Parallel startup with
    /// declared dependencies is a deliberate deferred feature.
    ///
    /// A failure aborts the startup pass: plugins that did start are
    /// cleaned up in reverse order before the error is returned.
    async fn start(&self) -> anyhow::Result<()> {
        let plugins = self.registry.list();
        tracing::info!(count = plugins.len(), "Starting plugins");

        let mut started: Vec<PluginDescriptor> = Vec::with_capacity(plugins.len());
        for descriptor in plugins {
            if let Err(err) = self.initialize_plugin(&descriptor).await {
                tracing::error!(
                    plugin_id = %descriptor.id,
                    started = started.len(),
                    "Aborting plugin startup, rolling back started plugins"
                );
                self.stop_in_reverse(&started).await;
                return Err(anyhow::Error::new(err)
                    .context(format!("plugin '{}' failed to initialize", descriptor.id)));
            }
            started.push(descriptor);
        }

        Ok(())
    }

    /// Clean up all plugins in reverse registration order, best effort.
    async fn stop(&self) -> anyhow::Result<()> {
        let plugins = self.registry.list();
        tracing::info!(count = plugins.len(), "Stopping plugins");

        match self.stop_in_reverse(&plugins).await {
            None => Ok(()),
            Some(err) => Err(anyhow::Error::new(err).context("plugin cleanup failed")),
        }
    }
}
