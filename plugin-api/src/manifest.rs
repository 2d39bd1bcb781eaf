//! Plugin manifest metadata.

use serde::{Deserialize, Serialize};

/// Static metadata describing a plugin.
///
/// Used by the kernel to identify plugins, check kernel compatibility and
/// populate the discovery surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin identifier (e.g., "smart-home")
    pub id: String,

    /// Human-readable plugin name (e.g., "Smart Home Control")
    pub name: String,

    /// Semantic version of the plugin
    pub version: semver::Version,

    /// Plugin author or organization
    #[serde(default)]
    pub author: String,

    /// Brief description of the plugin
    #[serde(default)]
    pub description: String,

    /// Required kernel version (semver range)
    pub kernel_version: semver::VersionReq,
}

impl PluginManifest {
    /// Create a manifest with minimal required fields.
    ///
    /// `version` falls back to 1.0.0 when it does not parse as semver.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: &str) -> Self {
        let parsed_version =
            semver::Version::parse(version).unwrap_or_else(|_| semver::Version::new(1, 0, 0));

        let kernel_version =
            semver::VersionReq::parse(">=1.0.0").unwrap_or(semver::VersionReq::STAR);

        Self {
            id: id.into(),
            name: name.into(),
            version: parsed_version,
            author: String::new(),
            description: String::new(),
            kernel_version,
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
