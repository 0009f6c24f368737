//! guest-init-rs library
//!
//! This crate provides a safe Rust implementation of a guest provisioning
//! agent for clouds exposing an OpenStack-style metadata service.
//!
//! # Design Principles
//!
//! - **Safety First**: No unsafe code (`#![forbid(unsafe_code)]`)
//! - **Fast Boot**: Minimal dependencies, async I/O, one pass per plugin
//! - **Explicit Seams**: Metadata service and OS layer are traits, so every
//!   plugin can be exercised against mocks

pub mod config;
pub mod metadata;
pub mod network;
pub mod osutils;
pub mod plugins;

mod error;

pub use error::GuestInitError;

use metadata::MetadataService;
use osutils::OsUtils;
use plugins::{ExecutionStatus, Plugin};
use tracing::info;

/// Run the given provisioning plugins in order
///
/// Plugins execute strictly sequentially. The returned flag is the logical
/// OR of every plugin's reboot-required result; the first plugin error
/// aborts the run.
pub async fn run_plugins(
    plugins: &[Box<dyn Plugin>],
    service: &dyn MetadataService,
    osutils: &dyn OsUtils,
) -> Result<bool, GuestInitError> {
    let mut reboot_required = false;

    for plugin in plugins {
        info!("Starting plugin: {}", plugin.name());
        let outcome = plugin.execute(service, osutils).await?;
        reboot_required |= outcome.reboot_required;

        match outcome.status {
            ExecutionStatus::Done => {
                info!("Completed plugin: {}", plugin.name());
            }
            ExecutionStatus::ExecuteOnNextBoot => {
                info!("Plugin {} deferred to next boot", plugin.name());
            }
        }
    }

    Ok(reboot_required)
}
