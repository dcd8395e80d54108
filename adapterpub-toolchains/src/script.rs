use std::path::Path;

use adapterpub_core::error::{Error, Result};
use adapterpub_core::toolchain::{run_command, BuildStatus, Toolchain};
use async_trait::async_trait;

use crate::node::tail;

/// Validates configured shell commands before execution.
pub struct CommandValidator;

impl CommandValidator {
    /// # Errors
    ///
    /// Rejects empty commands and commands carrying NUL bytes or embedded
    /// newlines.
    pub fn validate(command: &str) -> Result<()> {
        if command.trim().is_empty() {
            return Err(Error::InvalidConfig("Command cannot be empty".to_string()));
        }

        if command.contains('\0') {
            return Err(Error::InvalidConfig(format!(
                "Command contains a NUL byte: {:?}",
                command
            )));
        }

        if command.contains('\n') || command.contains('\r') {
            return Err(Error::InvalidConfig(format!(
                "Command spans multiple lines: {:?}",
                command
            )));
        }

        Ok(())
    }
}

/// Runs install and build commands from `adapterpub.toml` through `sh -c`.
pub struct ScriptToolchain {
    install: String,
    build: Option<String>,
}

impl ScriptToolchain {
    pub fn new(install: impl Into<String>, build: Option<String>) -> Self {
        Self {
            install: install.into(),
            build,
        }
    }

    fn failure(dir: &Path, message: String) -> Error {
        Error::Toolchain {
            toolchain: "script".to_string(),
            adapter: dir.display().to_string(),
            message,
        }
    }
}

#[async_trait]
impl Toolchain for ScriptToolchain {
    fn name(&self) -> &str {
        "script"
    }

    async fn install(&self, dir: &Path) -> Result<()> {
        CommandValidator::validate(&self.install)?;

        let output = run_command("sh", &["-c", self.install.as_str()], dir)
            .await
            .map_err(|e| Self::failure(dir, format!("Failed to run sh: {}", e)))?;
        if !output.success {
            return Err(Self::failure(
                dir,
                format!("'{}' failed: {}", self.install, tail(&output.stderr, 20)),
            ));
        }
        Ok(())
    }

    async fn build(&self, dir: &Path) -> Result<BuildStatus> {
        let build = match self.build.as_deref() {
            Some(build) if !build.trim().is_empty() => build,
            _ => return Ok(BuildStatus::NoBuildScript),
        };
        CommandValidator::validate(build)?;

        let output = run_command("sh", &["-c", build], dir)
            .await
            .map_err(|e| Self::failure(dir, format!("Failed to run sh: {}", e)))?;
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
