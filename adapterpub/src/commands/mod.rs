//! Command implementations for the CLI.

mod detect;
mod publish;
mod validate;

use std::path::{Path, PathBuf};

use adapterpub_core::{ChangeDetector, ChangeSet, CommitRange};
use anyhow::Result;

use crate::SourceArgs;

pub use detect::cmd_detect;
pub use publish::cmd_publish;
pub use validate::cmd_validate;

/// Explicit directories win; otherwise read stdin or diff git from the
/// current directory, which must be the repository root.
fn resolve_changes(
    adapters_dir: &Path,
    dirs: Vec<PathBuf>,
    source: &SourceArgs,
) -> Result<ChangeSet> {
    if !dirs.is_empty() {
        return Ok(dirs.into_iter().collect());
    }

    let changes = if source.stdin {
        ChangeDetector::detect_from_stdin(adapters_dir)?
    } else {
        let range = CommitRange::new(source.base.as_deref(), source.head.as_deref());
        ChangeDetector::detect_from_git(".", adapters_dir, &range)?
    };
    Ok(changes)
}
