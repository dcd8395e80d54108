use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const ENV_KEYS: &[&str] = &[
    "R2_ACCOUNT_ID",
    "R2_ACCESS_KEY_ID",
    "R2_SECRET_ACCESS_KEY",
    "R2_BUCKET_NAME",
    "R2_PUBLIC_URL",
    "R2_ENDPOINT",
    "SYNC_ENDPOINT",
    "SYNC_TOKEN",
];

fn get_adapterpub_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_adapterpub"))
}

fn adapterpub(cwd: &Path) -> Command {
    let mut command = Command::new(get_adapterpub_binary());
    command.current_dir(cwd);
    for key in ENV_KEYS {
        command.env_remove(key);
    }
    command
}

fn run_with_stdin(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn adapterpub");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn write_adapter(root: &Path, name: &str, metadata: &str) -> PathBuf {
    let dir = root.join("adapters").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), r#"{"name": "adapter"}"#).unwrap();
    fs::write(dir.join("metadata.json"), metadata).unwrap();
    dir
}

#[test]
fn test_detect_from_stdin_json() {
    let temp_dir = TempDir::new().unwrap();

    let mut command = adapterpub(temp_dir.path());
    command.args(["detect", "--stdin", "--json"]);
    let output = run_with_stdin(
        command,
        "adapters/foo/src/x.ts\nREADME.md\n\nadapters/bar/index.ts\nadapters/foo/package.json\n",
    );

    assert!(output.status.success(), "detect failed: {:?}", output);
    let dirs: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dirs, vec!["adapters/foo", "adapters/bar"]);
}

#[test]
fn test_publish_with_no_changes_needs_no_credentials() {
    let temp_dir = TempDir::new().unwrap();

    let mut command = adapterpub(temp_dir.path());
    command.args(["publish", "--stdin"]);
    let output = run_with_stdin(command, "README.md\ndocs/guide.md\n");

    assert!(output.status.success(), "publish failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to publish"));
}

#[test]
fn test_publish_reports_missing_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let dir = write_adapter(
        temp_dir.path(),
        "foo",
        r#"{"id": "foo", "version": "1.0.0"}"#,
    );

    let output = adapterpub(temp_dir.path())
        .arg("publish")
        .arg(&dir)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("R2_ACCOUNT_ID"));
    assert!(stderr.contains("SYNC_TOKEN"));
}

#[test]
fn test_publish_skips_directory_without_marker() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("adapters").join("notes");
    fs::create_dir_all(&dir).unwrap();
    let store_dir = temp_dir.path().join("bucket");

    let output = adapterpub(temp_dir.path())
        .args(["publish", "--mode", "latest", "--store-dir"])
        .arg(&store_dir)
        .arg(&dir)
        .output()
        .unwrap();

    assert!(output.status.success(), "publish failed: {:?}", output);
    assert_eq!(fs::read_dir(&store_dir).unwrap().count(), 0);
}

#[test]
fn test_publish_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let metadata = r#"{"id": "foo", "version": "1.0.0", "name": "Foo"}"#;
    let dir = write_adapter(temp_dir.path(), "foo", metadata);
    let store_dir = temp_dir.path().join("bucket");

    let output = adapterpub(temp_dir.path())
        .args(["publish", "--mode", "latest", "--dry-run", "--store-dir"])
        .arg(&store_dir)
        .arg(&dir)
        .output()
        .unwrap();

    assert!(output.status.success(), "publish failed: {:?}", output);
    assert_eq!(fs::read_dir(&store_dir).unwrap().count(), 0);
    assert_eq!(
        fs::read_to_string(dir.join("metadata.json")).unwrap(),
        metadata
    );
    assert!(!dir.join("node_modules").exists());
}

#[test]
fn test_validate_fails_on_bad_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_adapter(
        temp_dir.path(),
        "good",
        r#"{"id": "good", "version": "1.2.3"}"#,
    );
    let bad = write_adapter(
        temp_dir.path(),
        "bad",
        r#"{"id": "bad", "version": "one"}"#,
    );

    let output = adapterpub(temp_dir.path())
        .args(["validate", "--json"])
        .arg(&good)
        .arg(&bad)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report[0]["valid"], true);
    assert_eq!(report[1]["valid"], false);
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 adapter(s) failed validation"));
}
