//! Plugin Registration Macros
//!
//! Convenience wrapper around the `inventory::submit!` boilerplate for
//! built-in plugins.
//!
//! # Example
//!
//! ```ignore
//! use zeeky_kernel::register_plugin;
//! use zeeky_plugin_api::prelude::*;
//!
//! fn create_lights(_config: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
//!     Ok(Arc::new(LightsPlugin::new()))
//! }
//!
//! register_plugin!("lights", create_lights);
//! ```

/// Register a built-in plugin with the kernel.
///
/// # Arguments
///
/// * `$id` - The plugin identifier string; must match the manifest id of the
///   constructed plugin
/// * `$factory_fn` - Factory with signature
///   `fn(&serde_json::Value) -> Result<Arc<dyn Plugin>, PluginError>`
#[macro_export]
macro_rules! register_plugin {
    ($id:expr, $factory_fn:expr) => {
        ::inventory::submit! {
            $crate::plugin::registry::PluginConstructor::new($id, $factory_fn)
        }
    };
}
