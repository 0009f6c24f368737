//! Linux network configuration via iproute2
//!
//! Applies addresses and routes with `ip` and rewrites resolv.conf for DNS.
//! Changes take effect immediately, so no operation reports a reboot as
//! required.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use super::OsUtils;
use crate::GuestInitError;
use crate::network::netmask_to_prefix;

/// Adapters under /sys/class/net that are never configured
const SKIPPED_ADAPTERS: &[&str] = &["lo"];

/// Linux implementation of [`OsUtils`]
pub struct LinuxOsUtils {
    sysfs_net: PathBuf,
    resolv_conf: PathBuf,
}

impl LinuxOsUtils {
    pub fn new() -> Self {
        Self {
            sysfs_net: PathBuf::from("/sys/class/net"),
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
        }
    }

    /// Create with custom paths (for testing)
    pub fn with_paths(sysfs_net: impl Into<PathBuf>, resolv_conf: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_net: sysfs_net.into(),
            resolv_conf: resolv_conf.into(),
        }
    }

    async fn run_ip(args: &[&str]) -> Result<(), GuestInitError> {
        debug!("Running: ip {}", args.join(" "));

        let output = tokio::process::Command::new("ip")
            .args(args)
            .output()
            .await
            .map_err(|e| GuestInitError::Command(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GuestInitError::Command(format!(
                "ip {} failed: {}",
                args.join(" "),
                stderr
            )));
        }

        Ok(())
    }

    async fn write_resolv_conf(&self, dns_servers: &[String]) -> Result<(), GuestInitError> {
        let mut content = String::from("# Generated by guest-init\n");
        for server in dns_servers {
            content.push_str(&format!("nameserver {}\n", server));
        }

        fs::write(&self.resolv_conf, content)
            .await
            .map_err(GuestInitError::Io)
    }
}

impl Default for LinuxOsUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OsUtils for LinuxOsUtils {
    async fn get_network_adapters(&self) -> Result<Vec<String>, GuestInitError> {
        let mut adapters = Vec::new();

        let mut read_dir = fs::read_dir(&self.sysfs_net).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if !SKIPPED_ADAPTERS.contains(&name) {
                    adapters.push(name.to_string());
                }
            }
        }

        adapters.sort();
        Ok(adapters)
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
        info!("Applying static config to adapter '{}'", adapter_name);

        let prefix = netmask_to_prefix(netmask);
        let cidr = format!("{}/{}", address, prefix);

        Self::run_ip(&["addr", "flush", "dev", adapter_name]).await?;
        Self::run_ip(&[
            "addr", "add", &cidr, "broadcast", broadcast, "dev", adapter_name,
        ])
        .await?;
        Self::run_ip(&["link", "set", adapter_name, "up"]).await?;
        Self::run_ip(&["route", "replace", "default", "via", gateway]).await?;

        self.write_resolv_conf(dns_servers).await?;

        // iproute2 changes are live
        Ok(false)
    }

    async fn add_static_route(
        &self,
        destination: &str,
        netmask: &str,
        gateway: &str,
        metric: u32,
        _interface_index: u32,
    ) -> Result<(), GuestInitError> {
        info!("Adding static route to {}", destination);

        let prefix = netmask_to_prefix(netmask);
        let dest_cidr = format!("{}/{}", destination, prefix);
        let metric = metric.to_string();

        Self::run_ip(&[
            "route", "replace", &dest_cidr, "via", gateway, "metric", &metric,
        ])
        .await
    }
}
