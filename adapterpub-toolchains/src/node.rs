use std::fs;
use std::path::Path;

use adapterpub_core::error::{Error, Result};
use adapterpub_core::toolchain::{run_command, BuildStatus, CommandOutput, Toolchain};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// JavaScript package managers an adapter can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    #[inline]
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    fn lockfiles(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm => &["package-lock.json"],
            PackageManager::Pnpm => &["pnpm-lock.yaml"],
            PackageManager::Yarn => &["yarn.lock"],
            PackageManager::Bun => &["bun.lockb", "bun.lock"],
        }
    }

    /// Picks the package manager whose lockfile is present, defaulting to
    /// npm.
    pub fn detect(dir: &Path) -> Self {
        [PackageManager::Bun, PackageManager::Pnpm, PackageManager::Yarn]
            .into_iter()
            .find(|pm| pm.lockfiles().iter().any(|lock| dir.join(lock).exists()))
            .unwrap_or(PackageManager::Npm)
    }
}

/// Installs with `<pm> install` and builds with `<pm> run build`.
pub struct NodeToolchain {
    manager: PackageManager,
}

impl NodeToolchain {
    pub fn new(manager: PackageManager) -> Self {
        Self { manager }
    }

    fn adapter_name(dir: &Path) -> String {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| dir.display().to_string())
    }

    fn failure(&self, dir: &Path, message: String) -> Error {
        Error::Toolchain {
            toolchain: self.manager.program().to_string(),
            adapter: Self::adapter_name(dir),
            message,
        }
    }

    async fn run(&self, args: &[&str], dir: &Path) -> Result<CommandOutput> {
        run_command(self.manager.program(), args, dir)
            .await
            .map_err(|e| {
                self.failure(
                    dir,
                    format!("Failed to run {}: {}", self.manager.program(), e),
                )
            })
    }
}

/// Whether `package.json` in `dir` declares a `build` script.
pub fn has_build_script(dir: &Path) -> Result<bool> {
    let package_json_path = dir.join("package.json");
    let content = fs::read_to_string(&package_json_path)?;
    let json: Value = serde_json::from_str(&content).map_err(|error| Error::Json {
        error,
        context: package_json_path.display().to_string(),
    })?;

    Ok(json
        .get("scripts")
        .and_then(|scripts| scripts.get("build"))
        .and_then(|build| build.as_str())
        .map(|build| !build.trim().is_empty())
        .unwrap_or(false))
}

/// Last lines of a command's stderr, for error messages.
pub(crate) fn tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.trim_end().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[async_trait]
impl Toolchain for NodeToolchain {
    fn name(&self) -> &str {
        self.manager.program()
    }

    async fn install(&self, dir: &Path) -> Result<()> {
        debug!(manager = self.manager.program(), dir = %dir.display(), "installing dependencies");
        let output = self.run(&["install"], dir).await?;
        if !output.success {
            return Err(self.failure(
                dir,
                format!("install failed: {}", tail(&output.stderr, 20)),
            ));
        }
        Ok(())
    }

    async fn build(&self, dir: &Path) -> Result<BuildStatus> {
        if !has_build_script(dir)? {
            debug!(dir = %dir.display(), "package.json has no build script");
            return Ok(BuildStatus::NoBuildScript);
        }

        let output = self.run(&["run", "build"], dir).await?;
        if output.success {
            Ok(BuildStatus::Succeeded)
        } else {
            Ok(BuildStatus::Failed {
                code: output.code,
                stderr: tail(&output.stderr, 20),
            })
        }
    }
}
