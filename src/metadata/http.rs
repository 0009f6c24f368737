//! HTTP metadata service
//!
//! Fetches the metadata document and content blobs from the link-local
//! metadata endpoint, preferring a mounted config-drive when one is
//! present (no network needed).

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use super::{MetaData, MetadataService};
use crate::GuestInitError;

/// Metadata service URL (link-local address)
const METADATA_URL: &str = "http://169.254.169.254";

/// Config-drive mount locations to check
const CONFIG_DRIVE_PATHS: &[&str] = &[
    "/mnt/config",
    "/config-2",
    "/media/configdrive",
    "/run/guest-init/config-drive",
];

/// HTTP metadata service with config-drive fallback
pub struct HttpMetadataService {
    client: Client,
    metadata_url: String,
    config_drive: Option<PathBuf>,
}

impl HttpMetadataService {
    pub fn new() -> Self {
        Self {
            client: Self::build_client(),
            metadata_url: METADATA_URL.to_string(),
            config_drive: None,
        }
    }

    /// Create with a custom base URL (for testing)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Self::build_client(),
            metadata_url: base_url.to_string(),
            config_drive: None,
        }
    }

    /// Use a fixed config-drive mount point instead of probing
    pub fn with_config_drive(mut self, path: impl AsRef<Path>) -> Self {
        self.config_drive = Some(path.as_ref().to_path_buf());
        self
    }

    fn build_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Find a config-drive mount point holding the given namespace
    async fn find_config_drive(&self, namespace: &str) -> Option<PathBuf> {
        if let Some(path) = &self.config_drive {
            return Some(path.clone());
        }

        for path in CONFIG_DRIVE_PATHS {
            let meta_path = Path::new(path)
                .join(namespace)
                .join("latest/meta_data.json");
            if fs::metadata(&meta_path).await.is_ok() {
                return Some(PathBuf::from(path));
            }
        }
        None
    }

    /// Fetch a text resource from the HTTP service
    async fn fetch_http(&self, path: &str) -> Result<String, GuestInitError> {
        let url = format!("{}/{}", self.metadata_url, path);
        debug!("Fetching metadata resource from HTTP: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(GuestInitError::Metadata(format!(
                "Failed to fetch {}: {}",
                path,
                response.status()
            )))
        }
    }

    /// Read a text resource from the config-drive
    async fn read_config_drive(
        config_drive: &Path,
        path: &str,
    ) -> Result<String, GuestInitError> {
        let full_path = config_drive.join(path);
        debug!("Reading metadata resource from config-drive: {:?}", full_path);

        fs::read_to_string(&full_path).await.map_err(|e| {
            GuestInitError::Metadata(format!(
                "Failed to read config-drive resource {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    async fn fetch(&self, namespace: &str, path: &str) -> Result<String, GuestInitError> {
        if let Some(config_drive) = self.find_config_drive(namespace).await {
            Self::read_config_drive(&config_drive, path).await
        } else {
            self.fetch_http(path).await
        }
    }
}

impl Default for HttpMetadataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataService for HttpMetadataService {
    fn name(&self) -> &'static str {
        "Http"
    }

    async fn meta_data(&self, namespace: &str) -> Result<MetaData, GuestInitError> {
        let raw = self
            .fetch(namespace, &format!("{}/latest/meta_data.json", namespace))
            .await?;

        let meta: MetaData = serde_json::from_str(&raw)
            .map_err(|e| GuestInitError::Metadata(format!("Failed to parse meta_data.json: {}", e)))?;

        Ok(meta)
    }

    async fn content(&self, namespace: &str, name: &str) -> Result<String, GuestInitError> {
        self.fetch(namespace, &format!("{}/content/{}", namespace, name))
            .await
    }
}
