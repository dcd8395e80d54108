use std::fs;

use adapterpub_core::config::{ToolchainKind, ToolchainSettings};
use adapterpub_core::{BuildStatus, Error, Toolchain};
use adapterpub_toolchains::{
    get_toolchain, has_build_script, CommandValidator, NodeToolchain, PackageManager,
    ScriptToolchain,
};
use tempfile::TempDir;

#[test]
fn test_detects_package_manager_from_lockfile() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    assert_eq!(PackageManager::detect(dir), PackageManager::Npm);

    fs::write(dir.join("package-lock.json"), "{}").unwrap();
    assert_eq!(PackageManager::detect(dir), PackageManager::Npm);

    fs::write(dir.join("yarn.lock"), "").unwrap();
    assert_eq!(PackageManager::detect(dir), PackageManager::Yarn);

    fs::write(dir.join("pnpm-lock.yaml"), "").unwrap();
    assert_eq!(PackageManager::detect(dir), PackageManager::Pnpm);

    fs::write(dir.join("bun.lock"), "").unwrap();
    assert_eq!(PackageManager::detect(dir), PackageManager::Bun);
}

#[test]
fn test_has_build_script() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    fs::write(dir.join("package.json"), r#"{"name": "a"}"#).unwrap();
    assert!(!has_build_script(dir).unwrap());

    fs::write(
        dir.join("package.json"),
        r#"{"name": "a", "scripts": {"build": "  "}}"#,
    )
    .unwrap();
    assert!(!has_build_script(dir).unwrap());

    fs::write(
        dir.join("package.json"),
        r#"{"name": "a", "scripts": {"build": "tsc && esbuild src/index.ts"}}"#,
    )
    .unwrap();
    assert!(has_build_script(dir).unwrap());
}

#[test]
fn test_get_toolchain_follows_settings() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("pnpm-lock.yaml"), "").unwrap();

    let auto = ToolchainSettings::default();
    assert_eq!(get_toolchain(&auto, dir).name(), "pnpm");

    let yarn = ToolchainSettings {
        kind: ToolchainKind::Yarn,
        ..Default::default()
    };
    assert_eq!(get_toolchain(&yarn, dir).name(), "yarn");

    let script = ToolchainSettings {
        kind: ToolchainKind::Script,
        install: Some("make deps".to_string()),
        build: Some("make".to_string()),
    };
    assert_eq!(get_toolchain(&script, dir).name(), "script");
}

#[test]
fn test_command_validator() {
    assert!(CommandValidator::validate("npm ci --ignore-scripts").is_ok());
    assert!(CommandValidator::validate("   ").is_err());
    assert!(CommandValidator::validate("make\nrm -rf /").is_err());
    assert!(CommandValidator::validate("make\0").is_err());
}

#[tokio::test]
async fn test_node_build_without_script_runs_nothing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("package.json"), r#"{"name": "a"}"#).unwrap();

    let toolchain = NodeToolchain::new(PackageManager::Npm);
    let status = toolchain.build(temp_dir.path()).await.unwrap();
    assert_eq!(status, BuildStatus::NoBuildScript);
}

#[tokio::test]
async fn test_script_install_runs_in_adapter_dir() {
    let temp_dir = TempDir::new().unwrap();
    let toolchain = ScriptToolchain::new("echo installed > marker.txt", None);

    toolchain.install(temp_dir.path()).await.unwrap();
    let marker = fs::read_to_string(temp_dir.path().join("marker.txt")).unwrap();
    assert_eq!(marker.trim(), "installed");
}

#[tokio::test]
async fn test_script_install_failure_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let toolchain = ScriptToolchain::new("echo broken >&2; exit 3", None);

    match toolchain.install(temp_dir.path()).await {
        Err(Error::Toolchain { toolchain, message, .. }) => {
            assert_eq!(toolchain, "script");
            assert!(message.contains("broken"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_script_build_failure_is_reported_not_raised() {
    let temp_dir = TempDir::new().unwrap();
    let toolchain = ScriptToolchain::new("true", Some("echo oops >&2; exit 1".to_string()));

    match toolchain.build(temp_dir.path()).await.unwrap() {
        BuildStatus::Failed { code, stderr } => {
            assert_eq!(code, Some(1));
            assert_eq!(stderr, "oops");
        }
        other => panic!("unexpected status: {:?}", other),
    }
}

#[tokio::test]
async fn test_script_without_build_command() {
    let temp_dir = TempDir::new().unwrap();
    let toolchain = ScriptToolchain::new("true", None);

    assert_eq!(
        toolchain.build(temp_dir.path()).await.unwrap(),
        BuildStatus::NoBuildScript
    );
}
