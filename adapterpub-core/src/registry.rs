//! Registry sync: tells the central catalog about a newly published version.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RegistryConfig;
use crate::descriptor::AdapterDescriptor;
use crate::error::{Error, Result};

/// JSON body of a registry sync request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPayload {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub version: String,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
}

impl From<&AdapterDescriptor> for RegistryPayload {
    fn from(descriptor: &AdapterDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            icon: descriptor.icon.clone(),
            version: descriptor.version.clone(),
            authors: descriptor.authors.clone(),
            keywords: descriptor.keywords.clone(),
        }
    }
}

/// Destination for registry sync notifications.
#[async_trait]
pub trait RegistrySink: Send + Sync {
    /// # Errors
    ///
    /// Any non-2xx answer is an error; there is no retry.
    async fn sync(&self, payload: &RegistryPayload) -> Result<()>;
}

/// Posts payloads to the registry sync endpoint with a bearer token.
pub struct HttpRegistry {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl RegistrySink for HttpRegistry {
    async fn sync(&self, payload: &RegistryPayload) -> Result<()> {
        debug!(endpoint = %self.endpoint, id = %payload.id, version = %payload.version, "registry sync");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Registry sync request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::RegistrySync {
                status: status.as_u16(),
                body,
            })
        }
    }
}
