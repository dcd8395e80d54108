//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {context}: {error}")]
    Json {
        error: serde_json::Error,
        context: String,
    },

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Missing required environment variables: {}", keys.join(", "))]
    MissingConfig { keys: Vec<String> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metadata file not found: {0}. Every adapter must ship one next to its package.json.")]
    MetadataNotFound(PathBuf),

    #[error("Metadata file {path} is missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Invalid adapter descriptor in {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    #[error("Version {version} of {id} is already published (found {key}). Bump the version to publish again.")]
    VersionExists {
        id: String,
        version: String,
        key: String,
    },

    #[error("Build artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("Icon asset not found: {0}")]
    IconMissing(PathBuf),

    #[error("Object store error for '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("Registry sync failed with status {status}: {body}")]
    RegistrySync { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Toolchain '{toolchain}' failed for {adapter}: {message}")]
    Toolchain {
        toolchain: String,
        adapter: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
