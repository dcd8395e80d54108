//! Run configuration: the optional `adapterpub.toml` layout file and the
//! credentials read from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
pub const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
pub const ENV_BUCKET: &str = "R2_BUCKET_NAME";
pub const ENV_PUBLIC_URL: &str = "R2_PUBLIC_URL";
pub const ENV_ENDPOINT: &str = "R2_ENDPOINT";
pub const ENV_SYNC_ENDPOINT: &str = "SYNC_ENDPOINT";
pub const ENV_SYNC_TOKEN: &str = "SYNC_TOKEN";

/// Which key scheme a run publishes under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Immutable `{id}/{version}/...` keys plus registry sync.
    #[default]
    Versioned,
    /// Single `{id}/index.js` key, overwritten on every publish.
    Latest,
}

impl PublishMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishMode::Versioned => "versioned",
            PublishMode::Latest => "latest",
        }
    }
}

/// File locations inside an adapter directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Adapters without this file are skipped.
    pub marker_file: PathBuf,
    pub metadata_path: PathBuf,
    pub artifact_path: PathBuf,
    pub icon_path: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            marker_file: PathBuf::from("package.json"),
            metadata_path: PathBuf::from("metadata.json"),
            artifact_path: PathBuf::from("dist/index.js"),
            icon_path: PathBuf::from("icon.png"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainKind {
    /// Pick a package manager from the adapter's lockfile.
    #[default]
    Auto,
    Npm,
    Pnpm,
    Yarn,
    Bun,
    /// Run the `install` / `build` commands from the config file.
    Script,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    pub kind: ToolchainKind,
    pub install: Option<String>,
    pub build: Option<String>,
}

/// Contents of `adapterpub.toml`. Never holds secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: Layout,
    pub toolchain: ToolchainSettings,
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content).map_err(|error| Error::Toml {
            error,
            context: path.display().to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.toolchain.kind == ToolchainKind::Script && self.toolchain.install.is_none() {
            return Err(Error::InvalidConfig(
                "toolchain.kind = \"script\" requires toolchain.install".to_string(),
            ));
        }
        Ok(())
    }
}

/// Credentials and bucket for the S3-compatible object store.
#[derive(Clone)]
pub struct StoreConfig {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Overrides the account-derived endpoint.
    pub endpoint: Option<String>,
}

impl StoreConfig {
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.r2.cloudflarestorage.com", self.account_id),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Clone)]
pub struct RegistryConfig {
    pub endpoint: String,
    pub token: String,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Everything a publish run needs from the environment, validated once at
/// startup.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub mode: PublishMode,
    /// `None` when objects go to a local directory instead.
    pub store: Option<StoreConfig>,
    pub public_url: Option<String>,
    pub registry: Option<RegistryConfig>,
}

impl PublishConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] listing every required variable that
    /// is unset or empty.
    pub fn from_env(mode: PublishMode, remote_store: bool) -> Result<Self> {
        Self::from_lookup(mode, remote_store, |key| std::env::var(key).ok())
    }

    /// Same as [`PublishConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(mode: PublishMode, remote_store: bool, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |key: &str| -> String {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key.to_string());
                    String::new()
                }
            }
        };

        let store = if remote_store {
            Some(StoreConfig {
                account_id: require(ENV_ACCOUNT_ID),
                access_key_id: require(ENV_ACCESS_KEY_ID),
                secret_access_key: require(ENV_SECRET_ACCESS_KEY),
                bucket: require(ENV_BUCKET),
                endpoint: None,
            })
        } else {
            None
        };

        let (public_url, registry) = match mode {
            PublishMode::Versioned => {
                let public_url = require(ENV_PUBLIC_URL);
                let registry = RegistryConfig {
                    endpoint: require(ENV_SYNC_ENDPOINT),
                    token: require(ENV_SYNC_TOKEN),
                };
                (Some(public_url), Some(registry))
            }
            PublishMode::Latest => (None, None),
        };

        if !missing.is_empty() {
            return Err(Error::MissingConfig { keys: missing });
        }

        let store = store.map(|mut store| {
            store.endpoint = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty());
            store
        });

        Ok(Self {
            mode,
            store,
            public_url: public_url.map(|url| url.trim_end_matches('/').to_string()),
            registry,
        })
    }
}
