//! Publish command.

use std::path::Path;
use std::time::Instant;

use adapterpub_core::{
    FilesystemStore, HttpRegistry, ObjectStore, PublishConfig, PublishMode, PublishOutcome,
    Publisher, S3Store, Settings,
};
use adapterpub_toolchains::get_toolchain;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::info;

use crate::formatting::{
    format_duration, print_outcome_table, print_section_header, print_summary_box, SectionStyle,
};
use crate::reporter::CliPublishReporter;
use crate::PublishArgs;

use super::resolve_changes;

pub async fn cmd_publish(
    adapters_dir: &Path,
    config_path: &Path,
    args: PublishArgs,
) -> Result<()> {
    let start = Instant::now();
    let settings = Settings::load(config_path)?;
    let mode: PublishMode = args.mode.into();

    let changes = resolve_changes(adapters_dir, args.dirs, &args.source)?;
    if changes.is_empty() {
        info!("no adapter changes detected");
        println!("  {} Nothing to publish", "OK".green());
        return Ok(());
    }

    let config = PublishConfig::from_env(mode, args.store_dir.is_none())?;

    let store: Box<dyn ObjectStore> = match (&args.store_dir, &config.store) {
        (Some(dir), _) => Box::new(FilesystemStore::new(dir)?),
        (None, Some(store_config)) => Box::new(S3Store::new(store_config)?),
        (None, None) => anyhow::bail!("No object store configured"),
    };
    info!(
        location = %store.location(),
        mode = mode.as_str(),
        adapters = changes.len(),
        "starting publish"
    );

    let toolchain_settings = settings.toolchain.clone();
    let mut publisher = Publisher::new(
        settings.layout.clone(),
        mode,
        store,
        move |dir: &Path| get_toolchain(&toolchain_settings, dir),
        CliPublishReporter,
    )
    .dry_run(args.dry_run);

    if let Some(public_url) = config.public_url.as_deref() {
        publisher = publisher.with_public_url(public_url);
    }
    if let Some(registry_config) = config.registry.as_ref() {
        publisher = publisher.with_registry(Box::new(HttpRegistry::new(registry_config)?));
    }

    let title = if args.dry_run {
        "[Publishing adapters (dry run)]"
    } else {
        "[Publishing adapters]"
    };
    print_section_header(title, SectionStyle::Primary);

    let outcomes = publisher
        .publish_all(&changes)
        .await
        .context("Publish aborted")?;

    println!();
    print_outcome_table(&outcomes);
    println!();

    let published = outcomes
        .iter()
        .filter(|o| matches!(o, PublishOutcome::Published(_)))
        .count();
    let skipped = outcomes.len() - published;
    print_summary_box(
        "Summary",
        &[
            ("Mode", mode.as_str()),
            ("Published", &published.to_string()),
            ("Skipped", &skipped.to_string()),
            ("Duration", &format_duration(start.elapsed())),
        ],
    );

    Ok(())
}
