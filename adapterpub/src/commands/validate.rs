//! Metadata validation command.

use std::path::{Path, PathBuf};

use adapterpub_core::{AdapterDescriptor, Settings};
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::formatting::{
    print_error, print_section_header, print_success, print_warning, SectionStyle,
};
use crate::SourceArgs;

use super::resolve_changes;

pub fn cmd_validate(
    adapters_dir: &Path,
    config_path: &Path,
    dirs: Vec<PathBuf>,
    source: &SourceArgs,
    json: bool,
) -> Result<()> {
    let settings = Settings::load(config_path)?;
    let changes = resolve_changes(adapters_dir, dirs, source)?;

    let mut results = Vec::with_capacity(changes.len());
    for dir in &changes {
        if !dir.join(&settings.layout.marker_file).exists() {
            results.push((dir.clone(), None));
            continue;
        }
        let loaded = AdapterDescriptor::load(dir.join(&settings.layout.metadata_path));
        results.push((dir.clone(), Some(loaded)));
    }

    let failures = results
        .iter()
        .filter(|(_, loaded)| matches!(loaded, Some(Err(_))))
        .count();

    if json {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(dir, loaded)| match loaded {
                None => serde_json::json!({
                    "dir": dir.display().to_string(),
                    "skipped": true,
                }),
                Some(Ok(descriptor)) => serde_json::json!({
                    "dir": dir.display().to_string(),
                    "id": descriptor.id,
                    "version": descriptor.version,
                    "valid": true,
                }),
                Some(Err(e)) => serde_json::json!({
                    "dir": dir.display().to_string(),
                    "valid": false,
                    "error": e.to_string(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_section_header("[Validating adapters]", SectionStyle::Primary);

        if results.is_empty() {
            println!("  {} No adapters to validate", "OK".green());
        }
        for (dir, loaded) in &results {
            match loaded {
                None => print_warning(&format!(
                    "{} skipped (no {})",
                    dir.display(),
                    settings.layout.marker_file.display()
                )),
                Some(Ok(descriptor)) => print_success(&format!(
                    "{} → {}@{}",
                    dir.display(),
                    descriptor.id,
                    descriptor.version
                )),
                Some(Err(e)) => print_error(&format!("{}: {}", dir.display(), e)),
            }
        }
        println!();
    }

    if failures > 0 {
        anyhow::bail!("{} adapter(s) failed validation", failures);
    }

    Ok(())
}
