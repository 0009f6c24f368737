//! Mock OS layer for testing
//!
//! Records every network call so tests can assert on exact arguments, and
//! returns scripted reboot-required results.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::OsUtils;
use crate::GuestInitError;

/// A recorded OS-layer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsCall {
    SetStaticNetworkConfig {
        adapter_name: String,
        address: String,
        netmask: String,
        broadcast: String,
        gateway: String,
        dns_servers: Vec<String>,
    },
    AddStaticRoute {
        destination: String,
        netmask: String,
        gateway: String,
        metric: u32,
        interface_index: u32,
    },
}

/// Mock OS layer for testing
pub struct MockOsUtils {
    adapters: Vec<String>,
    reboot_results: Mutex<VecDeque<bool>>,
    calls: Mutex<Vec<OsCall>>,
}

impl MockOsUtils {
    /// Create a mock with no adapters and reboot never required
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            reboot_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the available adapters
    pub fn with_adapters(mut self, adapters: &[&str]) -> Self {
        self.adapters = adapters.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Script the reboot-required results of successive static-config calls
    ///
    /// Once the scripted results are exhausted, further calls return false.
    pub fn with_reboot_results(self, results: &[bool]) -> Self {
        self.reboot_results
            .lock()
            .unwrap()
            .extend(results.iter().copied());
        self
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> Vec<OsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded static-config calls only
    pub fn static_config_calls(&self) -> Vec<OsCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, OsCall::SetStaticNetworkConfig { .. }))
            .collect()
    }

    /// Recorded add-route calls only
    pub fn route_calls(&self) -> Vec<OsCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, OsCall::AddStaticRoute { .. }))
            .collect()
    }
}

impl Default for MockOsUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OsUtils for MockOsUtils {
    async fn get_network_adapters(&self) -> Result<Vec<String>, GuestInitError> {
        Ok(self.adapters.clone())
    }

    async fn set_static_network_config(
        &self,
        adapter_name: &str,
        address: &str,
        netmask: &str,
        broadcast: &str,
        gateway: &str,
        dns_servers: &[String],
    ) -> Result<bool, GuestInitError> {
        self.calls
            .lock()
            .unwrap()
            .push(OsCall::SetStaticNetworkConfig {
                adapter_name: adapter_name.to_string(),
                address: address.to_string(),
                netmask: netmask.to_string(),
                broadcast: broadcast.to_string(),
                gateway: gateway.to_string(),
                dns_servers: dns_servers.to_vec(),
            });

        Ok(self
            .reboot_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false))
    }

    async fn add_static_route(
        &self,
        destination: &str,
        netmask: &str,
        gateway: &str,
        metric: u32,
        interface_index: u32,
    ) -> Result<(), GuestInitError> {
        self.calls.lock().unwrap().push(OsCall::AddStaticRoute {
            destination: destination.to_string(),
            netmask: netmask.to_string(),
            gateway: gateway.to_string(),
            metric,
            interface_index,
        });

        Ok(())
    }
}
