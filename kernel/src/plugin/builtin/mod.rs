//! Built-in Plugin Registrations
//!
//! Registers the plugins that ship with the kernel using the `inventory`
//! crate. Each plugin lives in its own submodule and submits a
//! [`PluginConstructor`] via [`register_plugin!`](crate::register_plugin).
//!
//! # Plugins
//!
//! - `smart-home` — lights and devices (`turn_on`, `turn_off`, aliases)
//! - `productivity` — tasks and notes (`create_task`, `search_tasks`, `create_note`)
//! - `music` — playback control (`music_control`)
//!
//! Built-in plugin business logic is intentionally thin; the plugins exist
//! to exercise the routing and lifecycle core and to anchor the intent
//! names the NLU produces.

pub mod music;
pub mod productivity;
pub mod smart_home;
pub mod store;

use std::panic::AssertUnwindSafe;

use crate::config::PluginConfig;

use super::isolation::call_plugin_safely;
use super::registry::{PluginConstructor, PluginRegistry, RegistryError};

/// Instantiate and register every built-in plugin discovered via inventory.
///
/// Plugins listed in `config.disabled` are skipped; each remaining factory
/// receives its per-plugin configuration block (or `Null`). Factory panics
/// are isolated and surfaced as construction errors.
///
/// Returns the number of plugins registered.
pub fn register_builtin_plugins(
    registry: &PluginRegistry,
    config: &PluginConfig,
) -> Result<usize, RegistryError> {
    if !config.enabled {
        tracing::warn!("Plugin system disabled by configuration");
        return Ok(0);
    }

    let mut count = 0;
    for constructor in inventory::iter::<PluginConstructor> {
        if config.disabled.iter().any(|id| id == constructor.id) {
            tracing::info!(plugin_id = constructor.id, "Skipping disabled plugin");
            continue;
        }

        let plugin_config = config
            .plugin_config
            .get(constructor.id)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let plugin = call_plugin_safely(AssertUnwindSafe(|| {
            (constructor.factory)(&plugin_config)
        }))
        .map_err(|source| RegistryError::Construction {
            id: constructor.id.to_string(),
            source,
        })?;

        registry.register(plugin)?;
        count += 1;
    }

    tracing::info!(
        plugin_count = count,
        intent_count = registry.intent_names().len(),
        "Built-in plugins registered"
    );

    Ok(count)
}
