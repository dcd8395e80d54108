use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use adapterpub_core::change::{ChangeDetector, ChangeSet, CommitRange};
use adapterpub_core::Error;
use tempfile::TempDir;

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn test_single_file_maps_to_adapter_dir() {
    let changed = paths(&["adapters/foo/src/x.ts"]);
    let changes = ChangeDetector::from_paths(&changed, "adapters");

    assert_eq!(changes.into_vec(), vec![PathBuf::from("adapters/foo")]);
}

#[test]
fn test_non_adapter_paths_yield_empty_set() {
    let changed = paths(&["README.md", "docs/adapters/foo.md", ".github/workflows/publish.yml"]);
    let changes = ChangeDetector::from_paths(&changed, "adapters");

    assert!(changes.is_empty());
}

#[test]
fn test_files_directly_under_root_are_ignored() {
    let changed = paths(&["adapters/README.md", "adapters/bar/package.json"]);
    let changes = ChangeDetector::from_paths(&changed, "adapters");

    assert_eq!(changes.into_vec(), vec![PathBuf::from("adapters/bar")]);
}

#[test]
fn test_deduplicates_in_first_seen_order() {
    let changed = paths(&[
        "adapters/zeta/index.ts",
        "adapters/alpha/metadata.json",
        "adapters/zeta/package.json",
        "adapters/alpha/src/deep/file.ts",
    ]);
    let changes = ChangeDetector::from_paths(&changed, "adapters");

    assert_eq!(changes.len(), 2);
    assert_eq!(
        changes.into_vec(),
        vec![PathBuf::from("adapters/zeta"), PathBuf::from("adapters/alpha")]
    );
}

#[test]
fn test_custom_root() {
    let changed = paths(&["packages/integrations/slack/index.ts", "adapters/foo/x.ts"]);
    let changes = ChangeDetector::from_paths(&changed, "packages/integrations");

    assert_eq!(
        changes.into_vec(),
        vec![PathBuf::from("packages/integrations/slack")]
    );
}

#[test]
fn test_changeset_insert_reports_duplicates() {
    let mut set = ChangeSet::new();
    assert!(set.insert(PathBuf::from("adapters/foo")));
    assert!(!set.insert(PathBuf::from("adapters/foo")));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_commit_range_defaults_to_latest_commit() {
    let range = CommitRange::default();
    assert_eq!(range.base, "HEAD~1");
    assert_eq!(range.head, "HEAD");

    let range = CommitRange::new(Some("origin/main"), None);
    assert_eq!(range.base, "origin/main");
    assert_eq!(range.head, "HEAD");
}

#[test]
fn test_leading_cur_dir_in_root_is_ignored() {
    let changed = paths(&["adapters/foo/src/x.ts", "./adapters/bar/index.ts"]);
    let changes = ChangeDetector::from_paths(&changed, "./adapters");

    assert_eq!(
        changes.into_vec(),
        vec![PathBuf::from("adapters/foo"), PathBuf::from("adapters/bar")]
    );
}

fn git(repo: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_file(repo: &Path, relative: &str, content: &str) {
    let path = repo.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Creates a repository with an initial commit, then commits `files` on top.
fn repo_with_last_commit(files: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let repo = temp_dir.path();

    git(repo, &["init", "-q"]);
    git(repo, &["config", "user.email", "ci@example.com"]);
    git(repo, &["config", "user.name", "CI"]);
    git(repo, &["config", "commit.gpgsign", "false"]);

    write_file(repo, "README.md", "adapters\n");
    git(repo, &["add", "-A"]);
    git(repo, &["commit", "-q", "-m", "initial"]);

    for file in files {
        write_file(repo, file, "changed\n");
    }
    git(repo, &["add", "-A"]);
    git(repo, &["commit", "-q", "-m", "change"]);

    temp_dir
}

#[test]
fn test_git_commit_touching_one_adapter() {
    let temp_dir = repo_with_last_commit(&["adapters/foo/src/x.ts"]);

    let changes =
        ChangeDetector::detect_from_git(temp_dir.path(), "adapters", &CommitRange::default())
            .unwrap();
    assert_eq!(changes.into_vec(), vec![PathBuf::from("adapters/foo")]);
}

#[test]
fn test_git_commit_outside_adapters_is_empty() {
    let temp_dir = repo_with_last_commit(&["docs/guide.md", "adapters/NOTES.md"]);

    let changes =
        ChangeDetector::detect_from_git(temp_dir.path(), "adapters", &CommitRange::default())
            .unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_git_non_ascii_adapter_dir() {
    let temp_dir = repo_with_last_commit(&["adapters/föo/x.ts", "adapters/bar baz/index.ts"]);

    let changes =
        ChangeDetector::detect_from_git(temp_dir.path(), "adapters", &CommitRange::default())
            .unwrap();
    let mut dirs = changes.into_vec();
    dirs.sort();
    assert_eq!(
        dirs,
        vec![PathBuf::from("adapters/bar baz"), PathBuf::from("adapters/föo")]
    );
}

#[test]
fn test_git_root_with_cur_dir_prefix() {
    let temp_dir = repo_with_last_commit(&["adapters/foo/package.json"]);

    let changes =
        ChangeDetector::detect_from_git(temp_dir.path(), "./adapters", &CommitRange::default())
            .unwrap();
    assert_eq!(changes.into_vec(), vec![PathBuf::from("adapters/foo")]);
}

#[test]
fn test_git_unknown_revision_is_an_error() {
    let temp_dir = repo_with_last_commit(&["adapters/foo/x.ts"]);

    let range = CommitRange::new(Some("does-not-exist"), None);
    let result = ChangeDetector::detect_from_git(temp_dir.path(), "adapters", &range);
    assert!(matches!(result, Err(Error::Git(_))));
}
