//! Object storage for published artifacts.

mod filesystem;
mod s3;

pub use filesystem::FilesystemStore;
pub use s3::S3Store;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for object store backends.
///
/// Keys are `/`-separated relative paths such as `foo/1.0.0/index.js`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human readable location, used in logs.
    fn location(&self) -> String;

    /// Checks whether an object exists.
    ///
    /// # Errors
    ///
    /// Only "not found" maps to `Ok(false)`. Any other failure (denied
    /// access, server errors, network errors) is returned as an error.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Writes an object, replacing any existing one.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Writes an object only if `key` is still free.
    ///
    /// Returns `Ok(false)` without writing when another writer got there
    /// first.
    async fn put_if_absent(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<bool>;
}
