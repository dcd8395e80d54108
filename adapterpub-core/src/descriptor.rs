//! Adapter metadata as read from (and written back to) `metadata.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@_\-][A-Za-z0-9@_.\-]*$").expect("id pattern is valid"));

/// Metadata describing one publishable adapter.
///
/// Fields this type does not model are kept in `extra` so that rewriting the
/// file (to inject the icon URL) does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AdapterDescriptor {
    /// Reads and validates the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataNotFound`] if the file does not exist,
    /// [`Error::Json`] if it is not valid JSON, and [`Error::MissingField`] or
    /// [`Error::InvalidDescriptor`] if `id` / `version` are unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::MetadataNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;

        let descriptor: AdapterDescriptor =
            serde_json::from_str(&content).map_err(|error| Error::Json {
                error,
                context: path.display().to_string(),
            })?;

        descriptor.validate(path)?;
        Ok(descriptor)
    }

    /// Checks the fields the object store keys are derived from.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::MissingField {
                path: path.to_path_buf(),
                field: "id",
            });
        }
        if self.version.trim().is_empty() {
            return Err(Error::MissingField {
                path: path.to_path_buf(),
                field: "version",
            });
        }

        if self.id == "." || self.id == ".." || !ID_PATTERN.is_match(&self.id) {
            return Err(Error::InvalidDescriptor {
                path: path.to_path_buf(),
                message: format!(
                    "id '{}' must be a single key segment (letters, digits, '-', '_', '.', '@')",
                    self.id
                ),
            });
        }

        semver::Version::parse(&self.version).map_err(|e| Error::InvalidDescriptor {
            path: path.to_path_buf(),
            message: format!(
                "Invalid version format '{}': {}. Expected semver format (e.g., 1.2.3)",
                self.version, e
            ),
        })?;

        Ok(())
    }

    pub fn set_icon(&mut self, url: impl Into<String>) {
        self.icon = url.into();
    }

    /// Writes the descriptor back as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut content = serde_json::to_string_pretty(self).map_err(|error| Error::Json {
            error,
            context: path.display().to_string(),
        })?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }
}
