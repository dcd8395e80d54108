//! Per-adapter publish pipeline.
//!
//! Each adapter goes through the same fail-fast sequence: marker check,
//! descriptor load, existence guard, install, icon rewrite, build, artifact
//! checks, upload, registry sync. Nothing is rolled back on failure.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::change::ChangeSet;
use crate::config::{Layout, PublishMode};
use crate::descriptor::AdapterDescriptor;
use crate::error::{Error, Result};
use crate::registry::{RegistryPayload, RegistrySink};
use crate::reporter::PublishReporter;
use crate::store::ObjectStore;
use crate::target::{PublishTarget, CODE_CONTENT_TYPE, ICON_CONTENT_TYPE};
use crate::toolchain::{BuildStatus, Toolchain};

type ToolchainGetter = Box<dyn Fn(&Path) -> Box<dyn Toolchain> + Send + Sync>;

/// What happened to one adapter directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Skipped { dir: PathBuf, reason: String },
    Published(PublishedAdapter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAdapter {
    pub id: String,
    pub version: String,
    pub code_key: String,
    pub icon_key: Option<String>,
    pub icon_url: Option<String>,
    pub synced: bool,
    /// Checks ran but nothing was built, uploaded or synced.
    pub dry_run: bool,
}

/// Publishes adapter directories to an object store and registry.
pub struct Publisher {
    layout: Layout,
    mode: PublishMode,
    dry_run: bool,
    public_url: Option<String>,
    store: Box<dyn ObjectStore>,
    registry: Option<Box<dyn RegistrySink>>,
    toolchain_getter: ToolchainGetter,
    reporter: Box<dyn PublishReporter>,
}

impl Publisher {
    /// Creates a publisher.
    ///
    /// The `toolchain_getter` picks the toolchain used to install and build
    /// a given adapter directory.
    pub fn new<F, R>(
        layout: Layout,
        mode: PublishMode,
        store: Box<dyn ObjectStore>,
        toolchain_getter: F,
        reporter: R,
    ) -> Self
    where
        F: Fn(&Path) -> Box<dyn Toolchain> + Send + Sync + 'static,
        R: PublishReporter + 'static,
    {
        Self {
            layout,
            mode,
            dry_run: false,
            public_url: None,
            store,
            registry: None,
            toolchain_getter: Box::new(toolchain_getter),
            reporter: Box::new(reporter),
        }
    }

    /// Base URL the object store is publicly served from.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_registry(mut self, registry: Box<dyn RegistrySink>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Publishes every directory in `changes`, in order, stopping at the
    /// first failure.
    pub async fn publish_all(&self, changes: &ChangeSet) -> Result<Vec<PublishOutcome>> {
        let mut outcomes = Vec::with_capacity(changes.len());
        for dir in changes {
            outcomes.push(self.publish_adapter(dir).await?);
        }
        Ok(outcomes)
    }

    /// Publishes a single adapter directory.
    ///
    /// # Errors
    ///
    /// Any failed step aborts the adapter. Artifacts uploaded before the
    /// failure stay in place.
    pub async fn publish_adapter(&self, dir: &Path) -> Result<PublishOutcome> {
        if !dir.join(&self.layout.marker_file).exists() {
            let reason = format!("no {}", self.layout.marker_file.display());
            info!(dir = %dir.display(), %reason, "skipping");
            self.reporter.adapter_skipped(dir, &reason);
            return Ok(PublishOutcome::Skipped {
                dir: dir.to_path_buf(),
                reason,
            });
        }

        self.reporter.adapter_started(dir);

        let metadata_path = dir.join(&self.layout.metadata_path);
        let mut descriptor = AdapterDescriptor::load(&metadata_path)?;
        let target = PublishTarget::for_descriptor(&descriptor, self.mode);
        info!(id = %descriptor.id, version = %descriptor.version, mode = self.mode.as_str(), "publishing");

        let icon_url = match self.mode {
            PublishMode::Versioned => {
                self.ensure_unpublished(&descriptor, &target).await?;
                let public_url = self.public_url.as_deref().ok_or_else(|| {
                    Error::InvalidConfig("versioned publishing needs a public URL".to_string())
                })?;
                target.icon_url(public_url)
            }
            PublishMode::Latest => None,
        };

        if self.dry_run {
            return Ok(PublishOutcome::Published(PublishedAdapter {
                id: descriptor.id,
                version: descriptor.version,
                code_key: target.code_key,
                icon_key: target.icon_key,
                icon_url,
                synced: false,
                dry_run: true,
            }));
        }

        let toolchain = (self.toolchain_getter)(dir);
        toolchain.install(dir).await?;

        if let Some(ref url) = icon_url {
            descriptor.set_icon(url.as_str());
            descriptor.save(&metadata_path)?;
        }

        self.run_build(toolchain.as_ref(), dir, &descriptor).await?;

        let artifact_path = dir.join(&self.layout.artifact_path);
        if !artifact_path.exists() {
            return Err(Error::ArtifactMissing(artifact_path));
        }

        let icon_path = match target.icon_key {
            Some(_) => {
                let icon_path = dir.join(&self.layout.icon_path);
                if !icon_path.exists() {
                    return Err(Error::IconMissing(icon_path));
                }
                Some(icon_path)
            }
            None => None,
        };

        self.upload(&descriptor, &target.code_key, &artifact_path, CODE_CONTENT_TYPE)
            .await?;
        if let (Some(key), Some(path)) = (target.icon_key.as_deref(), icon_path.as_deref()) {
            self.upload(&descriptor, key, path, ICON_CONTENT_TYPE).await?;
        }

        let synced = match (&self.registry, self.mode) {
            (Some(registry), PublishMode::Versioned) => {
                registry.sync(&RegistryPayload::from(&descriptor)).await?;
                self.reporter.synced(&descriptor.id, &descriptor.version);
                true
            }
            _ => false,
        };

        Ok(PublishOutcome::Published(PublishedAdapter {
            id: descriptor.id,
            version: descriptor.version,
            code_key: target.code_key,
            icon_key: target.icon_key,
            icon_url,
            synced,
            dry_run: false,
        }))
    }

    /// Fails early, before any install or build, if a versioned key is
    /// already taken. The uploads themselves are conditional as well.
    async fn ensure_unpublished(
        &self,
        descriptor: &AdapterDescriptor,
        target: &PublishTarget,
    ) -> Result<()> {
        for key in target.keys() {
            if self.store.exists(key).await? {
                return Err(Error::VersionExists {
                    id: descriptor.id.clone(),
                    version: descriptor.version.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    async fn run_build(
        &self,
        toolchain: &dyn Toolchain,
        dir: &Path,
        descriptor: &AdapterDescriptor,
    ) -> Result<()> {
        match toolchain.build(dir).await? {
            BuildStatus::Succeeded => {
                info!(id = %descriptor.id, toolchain = toolchain.name(), "build succeeded");
            }
            BuildStatus::NoBuildScript => {
                let message = format!("{} has no build script, continuing", toolchain.name());
                warn!(id = %descriptor.id, "{}", message);
                self.reporter.build_warning(&descriptor.id, &message);
            }
            BuildStatus::Failed { code, stderr } => {
                let message = match code {
                    Some(code) => format!("build exited with code {}, continuing", code),
                    None => "build was terminated, continuing".to_string(),
                };
                warn!(id = %descriptor.id, stderr = %stderr.trim(), "{}", message);
                self.reporter.build_warning(&descriptor.id, &message);
            }
        }
        Ok(())
    }

    /// Versioned keys are written only if absent, so a concurrent publisher
    /// of the same version loses with [`Error::VersionExists`].
    async fn upload(
        &self,
        descriptor: &AdapterDescriptor,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let body = tokio::fs::read(path).await?;
        let bytes = body.len();
        match self.mode {
            PublishMode::Versioned => {
                if !self.store.put_if_absent(key, body, content_type).await? {
                    return Err(Error::VersionExists {
                        id: descriptor.id.clone(),
                        version: descriptor.version.clone(),
                        key: key.to_string(),
                    });
                }
            }
            PublishMode::Latest => self.store.put(key, body, content_type).await?,
        }
        info!(key, bytes, location = %self.store.location(), "uploaded");
        self.reporter.uploaded(key, bytes);
        Ok(())
    }
}
