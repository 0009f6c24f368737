//! Error types for guest-init-rs

use thiserror::Error;

/// Main error type for guest-init-rs operations
#[derive(Error, Debug)]
pub enum GuestInitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("No network adapter available")]
    NoAdapterAvailable,

    #[error("network_config format not recognized for the first adapter")]
    FirstAdapterFormatUnrecognized,

    #[error("network_config format not recognized for the second adapter")]
    SecondAdapterFormatUnrecognized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Command execution failed: {0}")]
    Command(String),

    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },
}

impl GuestInitError {
    /// Create a plugin error
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}
