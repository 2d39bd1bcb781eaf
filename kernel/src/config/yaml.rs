use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{ConfigError, ServerConfig};

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Environment
/// variables fill in anything the file leaves unset.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   cors_allowed_origins: "*"
///
/// dispatch:
///   timeout_ms: 10000
///
/// plugins:
///   enabled: true
///   disabled: ["music"]
///   config:
///     smart-home:
///       default_room: "living_room"
///
/// integrations:
///   - slack
///   - gemini
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub dispatch: Option<DispatchYaml>,
    pub plugins: Option<PluginsYaml>,
    pub integrations: Option<Vec<String>>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_allowed_origins: Option<String>,
}

/// Dispatch deadline configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DispatchYaml {
    pub timeout_ms: Option<u64>,
}

/// Plugin system configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PluginsYaml {
    pub enabled: Option<bool>,
    pub disabled: Option<Vec<String>>,
    pub config: Option<HashMap<String, serde_json::Value>>,
}

impl YamlConfig {
    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply every value the file sets on top of `config`.
    pub fn merge_into(self, config: &mut ServerConfig) {
        if let Some(server) = self.server {
            if let Some(host) = server.host {
                config.host = host;
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(origins) = server.cors_allowed_origins {
                config.cors_allowed_origins = Some(origins);
            }
        }
        if let Some(dispatch) = self.dispatch {
            if let Some(timeout_ms) = dispatch.timeout_ms {
                config.dispatch_timeout_ms = timeout_ms;
            }
        }
        if let Some(plugins) = self.plugins {
            if let Some(enabled) = plugins.enabled {
                config.plugins.enabled = enabled;
            }
            if let Some(disabled) = plugins.disabled {
                config.plugins.disabled = disabled;
            }
            if let Some(plugin_config) = plugins.config {
                config.plugins.plugin_config = plugin_config;
            }
        }
        if let Some(integrations) = self.integrations {
            config.integrations = integrations;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_merges_over_defaults() {
        let yaml: YamlConfig = serde_yaml::from_str(
            r#"
server:
  port: 9000
plugins:
  disabled: ["music"]
integrations:
  - slack
"#,
        )
        .unwrap();

        let mut config = ServerConfig::default();
        yaml.merge_into(&mut config);

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.plugins.disabled, vec!["music"]);
        assert!(config.plugins.enabled);
        assert_eq!(config.integrations, vec!["slack"]);
    }

    #[test]
    fn test_empty_yaml_is_noop() {
        let yaml: YamlConfig = serde_yaml::from_str("{}").unwrap();
        let mut config = ServerConfig::default();
        yaml.merge_into(&mut config);
        assert_eq!(config.address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_per_plugin_config_blocks() {
        let yaml: YamlConfig = serde_yaml::from_str(
            r#"
plugins:
  config:
    smart-home:
      default_room: "living_room"
"#,
        )
        .unwrap();

        let mut config = ServerConfig::default();
        yaml.merge_into(&mut config);
        let block = config.plugins.plugin_config.get("smart-home").unwrap();
        assert_eq!(block["default_room"], "living_room");
    }
}
