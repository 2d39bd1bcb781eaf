//! Smart Home Plugin
//!
//! Controls an in-memory set of lights. With a `device` entity the named
//! device is switched; without one, all devices are.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use zeeky_plugin_api::prelude::*;

use super::store::{KeyValueStore, MemoryStore};
use crate::register_plugin;

/// Devices seeded at initialization.
const DEFAULT_DEVICES: &[&str] = &["living_room_light", "bedroom_light", "kitchen_light"];

pub struct SmartHomePlugin {
    /// Device name -> powered on
    devices: Arc<dyn KeyValueStore<bool>>,
}

impl SmartHomePlugin {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Construct over an injected store.
    pub fn with_store(devices: Arc<dyn KeyValueStore<bool>>) -> Self {
        Self { devices }
    }

    fn set_all(&self, on: bool) -> usize {
        let entries = self.devices.entries();
        for (name, _) in &entries {
            self.devices.put(name.clone(), on);
        }
        entries.len()
    }

    fn switch(&self, intent: &Intent, ctx: &ExecutionContext, on: bool) -> Response {
        let verb = if on { "on" } else { "off" };

        if let Some(entity) = intent.entity("device") {
            let device = entity.value.as_str().unwrap_or_default().to_string();
            if self.devices.get(&device).is_none() {
                return Response::error(
                    &ctx.request_id,
                    format!("Unknown device '{device}'"),
                );
            }
            self.devices.put(device.clone(), on);
            return Response::confirmation(
                &ctx.request_id,
                format!("{device} has been turned {verb}."),
            );
        }

        let count = self.set_all(on);
        Response::confirmation(
            &ctx.request_id,
            format!("All lights have been turned {verb}."),
        )
        .with_data(json!({ "devices": count, "on": on }))
    }
}

impl Default for SmartHomePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for SmartHomePlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new("smart-home", "Smart Home Control", "1.0.0")
            .with_description("Lights and device switching")
    }

    fn intents(&self) -> Vec<String> {
        // Camel-case aliases kept for callers of the original dashboard API
        ["turn_on", "turnOn", "turn_off", "turnOff"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn initialize(&self) -> Result<(), PluginError> {
        for device in DEFAULT_DEVICES {
            self.devices.put(device.to_string(), false);
        }
        Ok(())
    }

    async fn handle_intent(
        &self,
        intent: &Intent,
        ctx: &ExecutionContext,
    ) -> Result<Response, PluginError> {
        match intent.name.as_str() {
            "turn_on" | "turnOn" => Ok(self.switch(intent, ctx, true)),
            "turn_off" | "turnOff" => Ok(self.switch(intent, ctx, false)),
            other => Err(PluginError::execution(format!(
                "smart-home received undeclared intent '{other}'"
            ))),
        }
    }
}

fn create_smart_home(_config: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(SmartHomePlugin::new()))
}

register_plugin!("smart-home", create_smart_home);
