//! Configuration module for the Zeeky kernel
//!
//! Handles configuration from .env files, YAML files and environment
//! variables. Priority: YAML > ENV vars > defaults.
//!
//! # Example
//! ```rust,no_run
//! use zeeky_kernel::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable fallback
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Kernel listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

mod yaml;

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use yaml::YamlConfig;

/// Default per-dispatch deadline in milliseconds.
const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {detail}")]
    Invalid { key: String, detail: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Plugin system configuration.
///
/// Backward compatible: if nothing is specified the plugin system is
/// enabled with all built-in plugins.
///
/// # Example YAML
/// ```yaml
/// plugins:
///   enabled: true
///   disabled: ["music"]
///   config:
///     smart-home:
///       default_room: "living_room"
/// ```
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Whether the plugin system is enabled (default: true)
    pub enabled: bool,

    /// Built-in plugin ids to skip at registration
    pub disabled: Vec<String>,

    /// Per-plugin configuration blocks, keyed by plugin id
    pub plugin_config: HashMap<String, serde_json::Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            plugin_config: HashMap::new(),
        }
    }
}

/// Kernel configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// Comma-separated CORS origins; "*" allows any; None = same-origin only
    pub cors_allowed_origins: Option<String>,

    /// Per-dispatch deadline in milliseconds
    pub dispatch_timeout_ms: u64,

    /// Plugin system settings
    pub plugins: PluginConfig,

    /// Configured outbound integrations, by name
    pub integrations: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: None,
            dispatch_timeout_ms: DEFAULT_DISPATCH_TIMEOUT_MS,
            plugins: PluginConfig::default(),
            integrations: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT".into(),
                detail: format!("'{port}' is not a valid port number"),
            })?;
        }
        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = Some(origins);
        }
        if let Ok(timeout) = std::env::var("DISPATCH_TIMEOUT_MS") {
            config.dispatch_timeout_ms =
                timeout.parse().map_err(|_| ConfigError::Invalid {
                    key: "DISPATCH_TIMEOUT_MS".into(),
                    detail: format!("'{timeout}' is not a valid millisecond count"),
                })?;
        }
        if let Ok(disabled) = std::env::var("PLUGINS_DISABLED") {
            config.plugins.disabled = split_csv(&disabled);
        }
        if let Ok(integrations) = std::env::var("ZEEKY_INTEGRATIONS") {
            config.integrations = split_csv(&integrations);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, with environment variables as
    /// fallback for anything the file does not set.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_env()?;
        let yaml = YamlConfig::load(path)?;
        yaml.merge_into(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Socket address string the server binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "DISPATCH_TIMEOUT_MS".into(),
                detail: "dispatch timeout must be positive".into(),
            });
        }
        Ok(())
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8000");
        assert_eq!(config.dispatch_timeout_ms, DEFAULT_DISPATCH_TIMEOUT_MS);
        assert!(config.plugins.enabled);
        assert!(config.integrations.is_empty());
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("slack, gemini ,"), vec!["slack", "gemini"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ServerConfig {
            dispatch_timeout_ms: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
