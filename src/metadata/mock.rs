//! Mock metadata service for testing
//!
//! Provides a configurable mock service that can be used in unit tests.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{MetaData, MetadataService};
use crate::GuestInitError;

/// Mock metadata service for testing
///
/// # Example
/// ```
/// use guest_init_rs::metadata::mock::MockMetadataService;
/// use guest_init_rs::metadata::MetaData;
///
/// let mock = MockMetadataService::new()
///     .with_meta_data(MetaData {
///         hostname: "test-host".to_string(),
///         ..Default::default()
///     })
///     .with_content("0000", "iface eth0 inet static\n");
/// ```
pub struct MockMetadataService {
    name: &'static str,
    meta_data: Option<MetaData>,
    contents: HashMap<String, String>,
    meta_data_error: Option<String>,
    content_error: Option<String>,
}

impl MockMetadataService {
    /// Create a new mock service with default values
    pub fn new() -> Self {
        Self {
            name: "Mock",
            meta_data: None,
            contents: HashMap::new(),
            meta_data_error: None,
            content_error: None,
        }
    }

    /// Set the service name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Set the metadata document to return
    pub fn with_meta_data(mut self, meta_data: MetaData) -> Self {
        self.meta_data = Some(meta_data);
        self
    }

    /// Set the metadata document from raw JSON
    pub fn with_meta_data_json(mut self, json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(meta) => self.meta_data = Some(meta),
            Err(e) => self.meta_data_error = Some(e.to_string()),
        }
        self
    }

    /// Register a named content blob
    pub fn with_content(mut self, name: &str, content: &str) -> Self {
        self.contents.insert(name.to_string(), content.to_string());
        self
    }

    /// Configure to return an error for meta_data
    pub fn with_meta_data_error(mut self, error: &str) -> Self {
        self.meta_data_error = Some(error.to_string());
        self
    }

    /// Configure to return an error for content
    pub fn with_content_error(mut self, error: &str) -> Self {
        self.content_error = Some(error.to_string());
        self
    }
}

impl Default for MockMetadataService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataService for MockMetadataService {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn meta_data(&self, _namespace: &str) -> Result<MetaData, GuestInitError> {
        if let Some(error) = &self.meta_data_error {
            return Err(GuestInitError::Metadata(error.clone()));
        }

        Ok(self.meta_data.clone().unwrap_or_default())
    }

    async fn content(&self, _namespace: &str, name: &str) -> Result<String, GuestInitError> {
        if let Some(error) = &self.content_error {
            return Err(GuestInitError::Metadata(error.clone()));
        }

        self.contents
            .get(name)
            .cloned()
            .ok_or_else(|| GuestInitError::Metadata(format!("No content named '{}'", name)))
    }
}
