//! S3-compatible object store backed by an `opendal` operator.

use async_trait::async_trait;
use opendal::{services, ErrorKind, Operator};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

use super::ObjectStore;

/// Region name S3-compatible services without regions accept.
const DEFAULT_REGION: &str = "auto";

/// S3 backend using path-style addressing (`{endpoint}/{bucket}/{key}`).
pub struct S3Store {
    operator: Operator,
    endpoint: String,
    bucket: String,
}

impl S3Store {
    /// Creates a new S3 store.
    ///
    /// Only the credentials in `config` are used; shared AWS config files and
    /// instance metadata are never consulted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the operator cannot be built from
    /// the configuration.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let endpoint = config.endpoint_url();
        let builder = services::S3::default()
            .endpoint(&endpoint)
            .bucket(&config.bucket)
            .region(DEFAULT_REGION)
            .access_key_id(&config.access_key_id)
            .secret_access_key(&config.secret_access_key)
            .disable_config_load()
            .disable_ec2_metadata();

        let operator = Operator::new(builder)
            .map_err(|e| {
                Error::InvalidConfig(format!(
                    "Invalid object store configuration for '{}': {}",
                    endpoint, e
                ))
            })?
            .finish();

        Ok(Self {
            operator,
            endpoint,
            bucket: config.bucket.clone(),
        })
    }

    fn storage_error(key: &str, action: &str, error: opendal::Error) -> Error {
        Error::Storage {
            key: key.to_string(),
            message: format!("{} failed: {}", action, error),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn location(&self) -> String {
        format!("{}/{}", self.endpoint, self.bucket)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        debug!(key, "object store stat");
        match self.operator.stat(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::storage_error(key, "Exists check", e)),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        debug!(key, bytes = body.len(), "object store write");
        self.operator
            .write_with(key, body)
            .content_type(content_type)
            .await
            .map_err(|e| Self::storage_error(key, "Upload", e))?;
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<bool> {
        debug!(key, bytes = body.len(), "object store conditional write");
        match self
            .operator
            .write_with(key, body)
            .content_type(content_type)
            .if_not_exists(true)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::ConditionNotMatch => Ok(false),
            Err(e) => Err(Self::storage_error(key, "Conditional upload", e)),
        }
    }
}
