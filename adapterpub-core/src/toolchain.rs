//! Toolchain trait for installing and building an adapter.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::Result;

/// Result of running an adapter's build.
///
/// A build that is missing or fails is not fatal by itself; the publisher
/// gates on the artifact instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Succeeded,
    NoBuildScript,
    Failed { code: Option<i32>, stderr: String },
}

/// A package manager that can install and build an adapter.
///
/// Implementations only run tools; they never read adapter metadata.
#[async_trait]
pub trait Toolchain: Send + Sync {
    fn name(&self) -> &str;

    /// Installs dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Toolchain`] if the install command fails.
    async fn install(&self, dir: &Path) -> Result<()>;

    async fn build(&self, dir: &Path) -> Result<BuildStatus>;
}

/// Exit status and captured stderr of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// Runs `program` with `args` in `dir`, capturing stderr.
///
/// # Errors
///
/// Returns an IO error if the program cannot be spawned. A non-zero exit is
/// reported through [`CommandOutput::success`], not as an error.
pub async fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<CommandOutput> {
    debug!(program, ?args, dir = %dir.display(), "running command");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
