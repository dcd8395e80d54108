//! Trait for reporting publish progress.

use std::path::Path;

/// Lets the publisher report progress without writing to stdout/stderr
/// itself.
pub trait PublishReporter: Send + Sync {
    fn adapter_started(&self, dir: &Path);
    fn adapter_skipped(&self, dir: &Path, reason: &str);

    /// A tolerated build problem (missing or failing build script).
    fn build_warning(&self, id: &str, message: &str);

    fn uploaded(&self, key: &str, bytes: usize);
    fn synced(&self, id: &str, version: &str);
}

/// Reporter that drops every event.
pub struct SilentReporter;

impl PublishReporter for SilentReporter {
    fn adapter_started(&self, _dir: &Path) {}
    fn adapter_skipped(&self, _dir: &Path, _reason: &str) {}
    fn build_warning(&self, _id: &str, _message: &str) {}
    fn uploaded(&self, _key: &str, _bytes: usize) {}
    fn synced(&self, _id: &str, _version: &str) {}
}
