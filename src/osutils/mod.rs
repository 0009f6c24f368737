//! Host OS network primitives
//!
//! Provisioning plugins apply configuration through the [`OsUtils`] trait;
//! the Linux implementation shells out to iproute2, and a recording mock
//! backs the tests.

pub mod linux;
pub mod mock;

use async_trait::async_trait;

use crate::GuestInitError;

/// Trait for host OS network operations
#[async_trait]
pub trait OsUtils: Send + Sync {
    /// Names of the currently available network adapters, in a stable order
    async fn get_network_adapters(&self) -> Result<Vec<String>, GuestInitError>;

    /// Apply a static IPv4 configuration to one adapter
    ///
    /// Returns whether a reboot is required for the change to take effect.
    #[allow(clippy::too_many_arguments)]
    async fn set_static_network_config(
        &self,
        adapter_name: &str,
        address: &str,
        netmask: &str,
        broadcast: &str,
        gateway: &str,
        dns_servers: &[String],
    ) -> Result<bool, GuestInitError>;

    /// Add a static route
    ///
    /// `interface_index` is accepted for OS layers that address adapters by
    /// index; the Linux implementation does not use it.
    async fn add_static_route(
        &self,
        destination: &str,
        netmask: &str,
        gateway: &str,
        metric: u32,
        interface_index: u32,
    ) -> Result<(), GuestInitError>;
}
