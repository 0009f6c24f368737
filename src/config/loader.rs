//! Agent config loader
//!
//! Loads and merges the agent configuration from standard locations.

use super::{AgentConfig, Paths};
use crate::GuestInitError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Load and merge the agent config from the main file and drop-ins
///
/// Drop-ins are applied in sorted order on top of the main file; a field set
/// in a later file wins.
pub async fn load_merged_config(paths: &Paths) -> Result<AgentConfig, GuestInitError> {
    let mut merged = AgentConfig::default();

    // 1. Main config (/etc/guest-init/agent.cfg)
    if let Some(config) = load_config_file(paths.main_config()).await? {
        debug!("Loaded base config from {}", paths.main_config().display());
        merged.merge(config);
    }

    // 2. Drop-in configs (/etc/guest-init/agent.cfg.d/*.cfg)
    for config in load_dropin_configs(paths.config_d()).await? {
        merged.merge(config);
    }

    Ok(merged)
}

/// Load agent config from a single file
async fn load_config_file(path: impl AsRef<Path>) -> Result<Option<AgentConfig>, GuestInitError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).await?;

    match AgentConfig::from_yaml(&content) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Load all drop-in configs from a directory (sorted alphabetically)
async fn load_dropin_configs(dir: impl AsRef<Path>) -> Result<Vec<AgentConfig>, GuestInitError> {
    let dir = dir.as_ref();

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();

    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let path = entry.path();

        // Only process .cfg files
        if path.extension().is_some_and(|e| e == "cfg") {
            entries.push(path);
        }
    }

    entries.sort();

    let mut configs = Vec::new();
    for path in entries {
        if let Some(config) = load_config_file(&path).await? {
            debug!("Loaded drop-in config from {}", path.display());
            configs.push(config);
        }
    }

    info!("Loaded {} drop-in configs", configs.len());
    Ok(configs)
}
