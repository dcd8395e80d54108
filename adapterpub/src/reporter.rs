//! Publish reporter implementation for CLI.

use std::path::Path;

use adapterpub_core::PublishReporter;

use crate::formatting::{print_info, print_success, print_warning};

/// CLI implementation of PublishReporter.
pub struct CliPublishReporter;

impl PublishReporter for CliPublishReporter {
    fn adapter_started(&self, dir: &Path) {
        print_info(&format!("{}", dir.display()));
    }

    fn adapter_skipped(&self, dir: &Path, reason: &str) {
        print_warning(&format!("Skipping {} ({})", dir.display(), reason));
    }

    fn build_warning(&self, id: &str, message: &str) {
        print_warning(&format!("{}: {}", id, message));
    }

    fn uploaded(&self, key: &str, bytes: usize) {
        print_success(&format!("Uploaded {} ({} bytes)", key, bytes));
    }

    fn synced(&self, id: &str, version: &str) {
        print_success(&format!("Synced {}@{} with the registry", id, version));
    }
}
