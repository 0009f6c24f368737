//! Provisioning plugins
//!
//! Each plugin handles one aspect of instance provisioning and is executed
//! once, in order, by the pipeline driver in the crate root.

pub mod network_config;

use async_trait::async_trait;

use crate::GuestInitError;
use crate::metadata::MetadataService;
use crate::osutils::OsUtils;

/// Plugin execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The plugin ran to completion
    Done,
    /// The plugin must run again on the next boot
    ExecuteOnNextBoot,
}

/// Result of a plugin execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginOutcome {
    pub status: ExecutionStatus,
    /// Whether the applied changes need a restart to take effect
    pub reboot_required: bool,
}

impl PluginOutcome {
    /// A completed execution
    pub fn done(reboot_required: bool) -> Self {
        Self {
            status: ExecutionStatus::Done,
            reboot_required,
        }
    }
}

/// Trait for provisioning plugins
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name of this plugin
    fn name(&self) -> &'static str;

    /// Execute the plugin against the metadata service and OS layer
    async fn execute(
        &self,
        service: &dyn MetadataService,
        osutils: &dyn OsUtils,
    ) -> Result<PluginOutcome, GuestInitError>;
}
