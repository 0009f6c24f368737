//! Static network configuration plugin
//!
//! Reads the `network_config` entry of the instance metadata, fetches the
//! referenced Debian-interfaces-style content blob, and applies static
//! configuration for up to two adapters through the OS layer.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{Plugin, PluginOutcome};
use crate::GuestInitError;
use crate::metadata::MetadataService;
use crate::network::interfaces::InterfacesFile;
use crate::osutils::OsUtils;

/// Metadata namespace holding the network configuration
const NAMESPACE: &str = "openstack";

/// Interface names of the two stanzas emitted by the provisioning layer
const FIRST_STANZA: &str = "eth0";
const SECOND_STANZA: &str = "eth1";

/// Metric of the static route attached to the second adapter
const ROUTE_METRIC: u32 = 1;
const ROUTE_INTERFACE_INDEX: u32 = 1;

/// Applies static network configuration from instance metadata
pub struct NetworkConfigPlugin {
    /// When set, configure exactly this adapter instead of auto-selecting
    /// from the available list
    network_adapter: Option<String>,
}

impl NetworkConfigPlugin {
    pub fn new(network_adapter: Option<String>) -> Self {
        Self { network_adapter }
    }
}

impl Default for NetworkConfigPlugin {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Plugin for NetworkConfigPlugin {
    fn name(&self) -> &'static str {
        "network_config"
    }

    async fn execute(
        &self,
        service: &dyn MetadataService,
        osutils: &dyn OsUtils,
    ) -> Result<PluginOutcome, GuestInitError> {
        let meta_data = service.meta_data(NAMESPACE).await?;

        // Absent network configuration is a normal no-op, not an error
        let Some(network_config) = meta_data.network_config else {
            return Ok(PluginOutcome::done(false));
        };
        let Some(content_path) = network_config.content_path else {
            return Ok(PluginOutcome::done(false));
        };

        let content_name = content_path
            .rsplit('/')
            .next()
            .unwrap_or(content_path.as_str());
        let raw_conf = service.content(NAMESPACE, content_name).await?;

        debug!("network config content:\n{}", raw_conf);

        let mut available_adapters = osutils.get_network_adapters().await?;
        if let Some(adapter) = &self.network_adapter {
            info!("Adapter override: '{}'", adapter);
            available_adapters = vec![adapter.clone()];
        }

        if available_adapters.is_empty() {
            return Err(GuestInitError::NoAdapterAvailable);
        }

        let conf = InterfacesFile::parse(&raw_conf);

        // First adapter
        let adapter_name = &available_adapters[0];
        let primary = conf
            .bind_adapter(FIRST_STANZA)
            .ok_or(GuestInitError::FirstAdapterFormatUnrecognized)?;

        info!("Configuring first network adapter: '{}'", adapter_name);
        let mut reboot_required = osutils
            .set_static_network_config(
                adapter_name,
                &primary.address,
                &primary.netmask,
                &primary.broadcast,
                &primary.gateway,
                &primary.dns_servers,
            )
            .await?;

        // Second adapter
        if available_adapters.len() >= 2 {
            let adapter_name = &available_adapters[1];
            let secondary = conf
                .bind_routed_adapter(SECOND_STANZA)
                .ok_or(GuestInitError::SecondAdapterFormatUnrecognized)?;

            info!("Configuring second network adapter: '{}'", adapter_name);
            // The stanza carries no gateway or DNS entries of its own: the
            // route gateway doubles as the default gateway and the first
            // adapter's DNS list is reused.
            reboot_required |= osutils
                .set_static_network_config(
                    adapter_name,
                    &secondary.address,
                    &secondary.netmask,
                    &secondary.broadcast,
                    &secondary.route.gateway,
                    &primary.dns_servers,
                )
                .await?;

            info!("Adding static route");
            osutils
                .add_static_route(
                    &secondary.route.destination,
                    &secondary.route.netmask,
                    &secondary.route.gateway,
                    ROUTE_METRIC,
                    ROUTE_INTERFACE_INDEX,
                )
                .await?;
        }

        Ok(PluginOutcome::done(reboot_required))
    }
}
