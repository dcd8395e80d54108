//! Filesystem backend, for local runs and tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::{Error, Result};

use super::ObjectStore;

/// Stores each object as a file under a root directory, mirroring the key.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Creates the store, creating `root` if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Maps a key to a path, refusing keys that would escape the root.
    pub fn object_path(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(Error::Storage {
                    key: key.to_string(),
                    message: "Invalid key segment".to_string(),
                });
            }
            path.push(segment);
        }
        Ok(path)
    }

    /// Writes `body` next to `path` so it can be moved into place atomically.
    async fn write_temp(path: &Path, body: Vec<u8>) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, body).await?;
        Ok(temp_path)
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.object_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.object_path(key)?;
        let temp_path = Self::write_temp(&path, body).await?;

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::Io(e));
        }

        Ok(())
    }

    async fn put_if_absent(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<bool> {
        let path = self.object_path(key)?;
        let temp_path = Self::write_temp(&path, body).await?;

        // Linking fails if the target exists, unlike rename.
        let linked = fs::hard_link(&temp_path, &path).await;
        let _ = fs::remove_file(&temp_path).await;

        match linked {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_then_exists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path()).unwrap();

        assert!(!store.exists("foo/1.0.0/index.js").await.unwrap());
        store
            .put("foo/1.0.0/index.js", b"export {}".to_vec(), "application/javascript")
            .await
            .unwrap();
        assert!(store.exists("foo/1.0.0/index.js").await.unwrap());

        let written = std::fs::read(temp_dir.path().join("foo/1.0.0/index.js")).unwrap();
        assert_eq!(written, b"export {}");
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path()).unwrap();

        assert!(store.exists("../outside").await.is_err());
        assert!(store.put("foo//index.js", Vec::new(), "text/plain").await.is_err());
    }

    #[tokio::test]
    async fn test_put_if_absent_keeps_existing_object() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(temp_dir.path()).unwrap();

        assert!(store
            .put_if_absent("foo/1.0.0/index.js", b"first".to_vec(), "application/javascript")
            .await
            .unwrap());
        assert!(!store
            .put_if_absent("foo/1.0.0/index.js", b"second".to_vec(), "application/javascript")
            .await
            .unwrap());

        let written = std::fs::read(temp_dir.path().join("foo/1.0.0/index.js")).unwrap();
        assert_eq!(written, b"first");
        assert!(!temp_dir.path().join("foo/1.0.0/index.tmp").exists());
    }
}
