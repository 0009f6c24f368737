//! Agent configuration parsing and types
//!
//! Handles the YAML agent configuration read from /etc/guest-init.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Agent configuration directory
pub const CONFIG_DIR: &str = "/etc/guest-init";

/// Agent configuration
///
/// All fields are optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Network adapter to configure. If not specified, the first two
    /// available adapters will be configured.
    pub network_adapter: Option<String>,

    /// Base URL of the metadata service (default: the link-local endpoint)
    pub metadata_url: Option<String>,

    /// Config-drive mount point to read instead of the HTTP service
    pub config_drive_path: Option<String>,
}

impl AgentConfig {
    /// Parse agent config from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Overlay `other` on top of self, field by field
    ///
    /// A field set in `other` wins; unset fields keep the current value.
    pub fn merge(&mut self, other: AgentConfig) {
        if other.network_adapter.is_some() {
            self.network_adapter = other.network_adapter;
        }
        if other.metadata_url.is_some() {
            self.metadata_url = other.metadata_url;
        }
        if other.config_drive_path.is_some() {
            self.config_drive_path = other.config_drive_path;
        }
    }
}

/// Standard agent config paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory (default: /etc/guest-init)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    /// Create with default paths
    pub fn new() -> Self {
        Self {
            config: PathBuf::from(CONFIG_DIR),
        }
    }

    /// Create with a custom config directory (useful for testing)
    pub fn with_config_dir(config: impl AsRef<Path>) -> Self {
        Self {
            config: config.as_ref().to_path_buf(),
        }
    }

    /// /etc/guest-init/agent.cfg - Main config file
    pub fn main_config(&self) -> PathBuf {
        self.config.join("agent.cfg")
    }

    /// /etc/guest-init/agent.cfg.d - Config drop-in directory
    pub fn config_d(&self) -> PathBuf {
        self.config.join("agent.cfg.d")
    }
}
