//! Cloud metadata service access
//!
//! The metadata service supplies the instance metadata document and named
//! content blobs. Provisioning plugins consume it through the
//! [`MetadataService`] trait so they can be tested against a mock.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::Deserialize;

use crate::GuestInitError;

/// Instance metadata document
///
/// The subset of `meta_data.json` the agent consumes; unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaData {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub hostname: String,
    /// Reference to the network configuration content blob, when present
    pub network_config: Option<NetworkConfigRef>,
}

/// Reference to a network configuration content blob
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfigRef {
    /// Path of the blob in the content store, e.g. `/content/0000`
    pub content_path: Option<String>,
}

/// Trait for cloud metadata services
///
/// Namespaces mirror the metadata endpoint layout (`openstack` for the
/// OpenStack-style document tree).
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Name of this service (e.g., "Http", "Mock")
    fn name(&self) -> &'static str;

    /// Fetch the instance metadata document for a namespace
    async fn meta_data(&self, namespace: &str) -> Result<MetaData, GuestInitError>;

    /// Fetch a named content blob for a namespace
    async fn content(&self, namespace: &str, name: &str) -> Result<String, GuestInitError>;
}
