//! Change detection for determining which adapters a commit touched.

use std::path::{Component, Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Adapter directories touched by a commit range, deduplicated in order of
/// first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    dirs: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory, returning `false` if it was already present.
    pub fn insert(&mut self, dir: PathBuf) -> bool {
        if self.dirs.contains(&dir) {
            return false;
        }
        self.dirs.push(dir);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.dirs.iter()
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.dirs
    }
}

impl FromIterator<PathBuf> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

/// Commit range to diff. Defaults to the latest commit (`HEAD~1..HEAD`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub base: String,
    pub head: String,
}

impl Default for CommitRange {
    fn default() -> Self {
        Self {
            base: "HEAD~1".to_string(),
            head: "HEAD".to_string(),
        }
    }
}

impl CommitRange {
    pub fn new(base: Option<&str>, head: Option<&str>) -> Self {
        let default = Self::default();
        Self {
            base: base.map(str::to_string).unwrap_or(default.base),
            head: head.map(str::to_string).unwrap_or(default.head),
        }
    }
}

/// Maps changed files onto adapter directories.
pub struct ChangeDetector;

impl ChangeDetector {
    /// Maps changed paths to the adapter directories under `root` that
    /// contain them. Paths outside `root`, or directly inside it, are ignored.
    ///
    /// Leading `./` components are ignored on both sides, so `./adapters`
    /// matches git's `adapters/...` output.
    pub fn from_paths(changed_files: &[impl AsRef<Path>], root: impl AsRef<Path>) -> ChangeSet {
        let root = strip_cur_dir(root.as_ref());
        changed_files
            .iter()
            .filter_map(|path| Self::file_to_adapter(&strip_cur_dir(path.as_ref()), &root))
            .collect()
    }

    /// Diffs `range` in the repository at `repo_dir`.
    pub fn detect_from_git(
        repo_dir: impl AsRef<Path>,
        root: impl AsRef<Path>,
        range: &CommitRange,
    ) -> Result<ChangeSet> {
        let changed_files = Self::git_diff(repo_dir.as_ref(), range)?;
        debug!(files = changed_files.len(), base = %range.base, head = %range.head, "git diff");
        Ok(Self::from_paths(&changed_files, root))
    }

    /// Reads changed files from stdin (one path per line).
    pub fn detect_from_stdin(root: impl AsRef<Path>) -> Result<ChangeSet> {
        use std::io::{self, BufRead};

        let stdin = io::stdin();
        let mut changed_files = Vec::new();

        for line in stdin.lock().lines() {
            let line = line?;
            let path = PathBuf::from(line.trim());
            if !path.as_os_str().is_empty() {
                changed_files.push(path);
            }
        }

        Ok(Self::from_paths(&changed_files, root))
    }

    fn file_to_adapter(file_path: &Path, root: &Path) -> Option<PathBuf> {
        let relative = file_path.strip_prefix(root).ok()?;
        let mut components = relative.components();

        let name = match components.next()? {
            Component::Normal(name) => name,
            _ => return None,
        };
        // A file sitting directly under the root names no adapter.
        components.next()?;

        Some(root.join(name))
    }

    fn git_diff(repo_dir: &Path, range: &CommitRange) -> Result<Vec<PathBuf>> {
        // Unquoted, NUL-separated names keep non-ASCII paths intact.
        let output = Command::new("git")
            .args(["-c", "core.quotePath=false", "diff", "--name-only", "-z"])
            .arg(&range.base)
            .arg(&range.head)
            .current_dir(repo_dir)
            .output()
            .map_err(|e| Error::Git(format!("Failed to run git diff: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "git diff {} {} failed: {}",
                range.base,
                range.head,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let files: Vec<PathBuf> = stdout
            .split('\0')
            .filter(|name| !name.is_empty())
            .map(PathBuf::from)
            .collect();

        Ok(files)
    }
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| matches!(c, Component::CurDir))
        .collect()
}
