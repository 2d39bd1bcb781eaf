//! Plugin Registry
//!
//! Single source of truth mapping an intent name to the plugin that handles
//! it, and tracking the full set of installed plugins for lifecycle fan-out.
//!
//! Built-in plugins are registered at compile time using the `inventory`
//! crate and instantiated into a registry at startup. The registry uses
//! DashMap for concurrent O(1) amortized lookups.
//!
//! # Precondition
//!
//! `register`/`unregister` are assumed to happen during startup/shutdown,
//! before concurrent dispatch begins. The maps themselves are safe for
//! concurrent access, but a plugin unregistered mid-dispatch may still
//! finish its in-flight call.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use zeeky_plugin_api::{Plugin, PluginError, PluginManifest};

use super::lifecycle::{LifecycleState, PluginEntry, PluginMetrics};

/// Errors raised at plugin registration time.
///
/// These are configuration defects caught at startup, not dispatch-time
/// conditions, so they surface as real errors rather than response
/// envelopes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A second plugin claimed an intent that is already owned
    #[error(
        "intent '{intent}' is already owned by plugin '{owner}', rejected claim by '{claimant}'"
    )]
    DuplicateIntent {
        intent: String,
        owner: String,
        claimant: String,
    },

    /// A plugin with the same id is already registered
    #[error("plugin id '{0}' is already registered")]
    DuplicateId(String),

    /// Unknown plugin id
    #[error("plugin '{0}' is not registered")]
    NotFound(String),

    /// Plugin construction failed during registration
    #[error("failed to construct plugin '{id}': {source}")]
    Construction {
        id: String,
        #[source]
        source: PluginError,
    },
}

/// Registry entry handed out by `resolve`/`list`.
#[derive(Clone)]
pub struct PluginDescriptor {
    /// Globally unique plugin id
    pub id: String,

    /// Static plugin metadata
    pub manifest: PluginManifest,

    /// Intent names this plugin owns, snapshotted at registration
    pub intents: Vec<String>,

    /// The plugin instance
    pub plugin: Arc<dyn Plugin>,
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("intents", &self.intents)
            .finish_non_exhaustive()
    }
}

struct RegisteredPlugin {
    descriptor: PluginDescriptor,
    entry: PluginEntry,
}

/// Factory function type for built-in plugin construction.
///
/// Receives the plugin-specific configuration block (JSON, `Null` when the
/// operator configured nothing).
pub type PluginFactoryFn = fn(&Value) -> Result<Arc<dyn Plugin>, PluginError>;

/// Plugin constructor for inventory-based registration.
///
/// Uses a function pointer to defer plugin construction until startup,
/// making it compatible with `inventory::submit!`.
pub struct PluginConstructor {
    /// Plugin id, must match the constructed plugin's manifest id
    pub id: &'static str,

    /// Factory to create the plugin instance
    pub factory: PluginFactoryFn,
}

impl PluginConstructor {
    pub const fn new(id: &'static str, factory: PluginFactoryFn) -> Self {
        Self { id, factory }
    }
}

// Collect all registered plugin constructors at link time
inventory::collect!(PluginConstructor);

/// Central plugin registry.
pub struct PluginRegistry {
    /// Registered plugins indexed by id
    plugins: DashMap<String, RegisteredPlugin>,

    /// Intent name -> owning plugin id
    intent_index: DashMap<String, String>,

    /// Plugin ids in registration order, for deterministic lifecycle fan-out
    order: RwLock<Vec<String>>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: DashMap::new(),
            intent_index: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Register a plugin and all of its declared intents.
    ///
    /// Fails with [`RegistryError::DuplicateIntent`] if any declared intent
    /// is already claimed; the registry is left unchanged in that case
    /// (first registrant wins).
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), RegistryError> {
        let manifest = plugin.manifest();
        let id = manifest.id.clone();
        let intents = plugin.intents();

        if self.plugins.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        // Reject before mutating anything so a failed registration leaves
        // the previous owner intact
        for intent in &intents {
            if let Some(owner) = self.intent_index.get(intent) {
                return Err(RegistryError::DuplicateIntent {
                    intent: intent.clone(),
                    owner: owner.value().clone(),
                    claimant: id,
                });
            }
        }

        for intent in &intents {
            self.intent_index.insert(intent.clone(), id.clone());
        }

        let descriptor = PluginDescriptor {
            id: id.clone(),
            manifest,
            intents: intents.clone(),
            plugin,
        };
        self.plugins.insert(
            id.clone(),
            RegisteredPlugin {
                descriptor,
                entry: PluginEntry::new(),
            },
        );
        self.order.write().push(id.clone());

        tracing::debug!(
            plugin_id = %id,
            intents = ?intents,
            "Registered plugin"
        );

        Ok(())
    }

    /// Remove a plugin and all of its intents from the lookup table.
    pub fn unregister(&self, plugin_id: &str) -> Result<(), RegistryError> {
        let (_, removed) = self
            .plugins
            .remove(plugin_id)
            .ok_or_else(|| RegistryError::NotFound(plugin_id.to_string()))?;

        for intent in &removed.descriptor.intents {
            self.intent_index.remove(intent);
        }
        self.order.write().retain(|id| id != plugin_id);

        tracing::debug!(plugin_id = %plugin_id, "Unregistered plugin");

        Ok(())
    }

    /// O(1) lookup of the plugin owning an intent name.
    pub fn resolve(&self, intent_name: &str) -> Option<PluginDescriptor> {
        let owner = self.intent_index.get(intent_name)?.value().clone();
        self.plugins
            .get(&owner)
            .map(|record| record.descriptor.clone())
    }

    /// Look up a plugin by id.
    pub fn get(&self, plugin_id: &str) -> Option<PluginDescriptor> {
        self.plugins
            .get(plugin_id)
            .map(|record| record.descriptor.clone())
    }

    /// All registered plugins, in registration order.
    pub fn list(&self) -> Vec<PluginDescriptor> {
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| self.plugins.get(id).map(|r| r.descriptor.clone()))
            .collect()
    }

    /// Check whether any plugin owns the given intent name.
    pub fn has_intent(&self, intent_name: &str) -> bool {
        self.intent_index.contains_key(intent_name)
    }

    /// All registered intent names.
    pub fn intent_names(&self) -> Vec<String> {
        self.intent_index
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Current lifecycle state of a plugin.
    pub fn state(&self, plugin_id: &str) -> Option<LifecycleState> {
        self.plugins.get(plugin_id).map(|record| record.entry.state)
    }

    /// Transition a plugin to a new lifecycle state.
    pub fn set_state(&self, plugin_id: &str, state: LifecycleState) {
        if let Some(mut record) = self.plugins.get_mut(plugin_id) {
            record.entry.transition(state);
        }
    }

    /// Record a successful dispatch for a plugin.
    pub fn record_success(&self, plugin_id: &str) {
        if let Some(mut record) = self.plugins.get_mut(plugin_id) {
            record.entry.record_success();
        }
    }

    /// Record a failed dispatch for a plugin.
    pub fn record_error(&self, plugin_id: &str, error: impl Into<String>) {
        if let Some(mut record) = self.plugins.get_mut(plugin_id) {
            record.entry.record_error(error);
        }
    }

    /// Health metrics for one plugin.
    pub fn metrics(&self, plugin_id: &str) -> Option<PluginMetrics> {
        self.plugins
            .get(plugin_id)
            .map(|record| PluginMetrics::from(&record.entry))
    }

    /// Health metrics for all plugins, in registration order.
    pub fn all_metrics(&self) -> Vec<(String, PluginMetrics)> {
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| {
                self.plugins
                    .get(id)
                    .map(|r| (id.clone(), PluginMetrics::from(&r.entry)))
            })
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zeeky_plugin_api::{ExecutionContext, Intent, Response};

    struct StaticPlugin {
        id: &'static str,
        intents: Vec<String>,
    }

    impl StaticPlugin {
        fn new(id: &'static str, intents: &[&str]) -> Arc<dyn Plugin> {
            Arc::new(Self {
                id,
                intents: intents.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    #[async_trait]
    impl Plugin for StaticPlugin {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new(self.id, self.id, "1.0.0")
        }

        fn intents(&self) -> Vec<String> {
            self.intents.clone()
        }

        async fn handle_intent(
            &self,
            _intent: &Intent,
            ctx: &ExecutionContext,
        ) -> Result<Response, PluginError> {
            Ok(Response::confirmation(&ctx.request_id, "ok"))
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = PluginRegistry::new();
        registry
            .register(StaticPlugin::new("lights", &["turn_on", "turn_off"]))
            .unwrap();

        let descriptor = registry.resolve("turn_on").unwrap();
        assert_eq!(descriptor.id, "lights");
        assert!(registry.has_intent("turn_off"));
        assert!(!registry.has_intent("create_task"));
        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_duplicate_intent_rejected_registry_unchanged() {
        let registry = PluginRegistry::new();
        registry
            .register(StaticPlugin::new("tasks-a", &["create_task"]))
            .unwrap();

        let err = registry
            .register(StaticPlugin::new("tasks-b", &["list_notes", "create_task"]))
            .unwrap_err();

        match err {
            RegistryError::DuplicateIntent {
                intent,
                owner,
                claimant,
            } => {
                assert_eq!(intent, "create_task");
                assert_eq!(owner, "tasks-a");
                assert_eq!(claimant, "tasks-b");
            }
            other => panic!("Expected DuplicateIntent, got {other:?}"),
        }

        // First registrant still owns the intent, and no partial claim from
        // the rejected plugin leaked in
        assert_eq!(registry.resolve("create_task").unwrap().id, "tasks-a");
        assert!(!registry.has_intent("list_notes"));
        assert_eq!(registry.plugin_count(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = PluginRegistry::new();
        registry
            .register(StaticPlugin::new("lights", &["turn_on"]))
            .unwrap();

        let err = registry
            .register(StaticPlugin::new("lights", &["other_intent"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(id) if id == "lights"));
    }

    #[test]
    fn test_unregister() {
        let registry = PluginRegistry::new();
        registry
            .register(StaticPlugin::new("lights", &["turn_on"]))
            .unwrap();

        registry.unregister("lights").unwrap();
        assert!(registry.resolve("turn_on").is_none());
        assert_eq!(registry.plugin_count(), 0);

        let err = registry.unregister("lights").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let registry = PluginRegistry::new();
        registry.register(StaticPlugin::new("b", &["i1"])).unwrap();
        registry.register(StaticPlugin::new("a", &["i2"])).unwrap();
        registry.register(StaticPlugin::new("c", &["i3"])).unwrap();

        let ids: Vec<String> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_state_and_metrics() {
        let registry = PluginRegistry::new();
        registry
            .register(StaticPlugin::new("lights", &["turn_on"]))
            .unwrap();

        assert_eq!(
            registry.state("lights"),
            Some(LifecycleState::Uninitialized)
        );

        registry.set_state("lights", LifecycleState::Running);
        registry.record_success("lights");
        registry.record_error("lights", "boom");

        let metrics = registry.metrics("lights").unwrap();
        assert_eq!(metrics.call_count, 2);
        assert_eq!(metrics.error_count, 1);
        assert_eq!(metrics.state, "running");
        assert_eq!(metrics.last_error.as_deref(), Some("boom"));
    }
}
