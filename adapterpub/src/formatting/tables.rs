//! Table formatting utilities using comfy-table.

use adapterpub_core::PublishOutcome;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;

/// Prints one row per processed adapter directory.
pub fn print_outcome_table(outcomes: &[PublishOutcome]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Adapter").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Version").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Key").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for outcome in outcomes {
        match outcome {
            PublishOutcome::Skipped { dir, reason } => {
                table.add_row(vec![
                    Cell::new(dir.display()).fg(comfy_table::Color::White),
                    Cell::new("-").fg(comfy_table::Color::DarkGrey),
                    Cell::new("-").fg(comfy_table::Color::DarkGrey),
                    Cell::new(format!("skipped ({})", reason)).fg(comfy_table::Color::Yellow),
                ]);
            }
            PublishOutcome::Published(adapter) => {
                let status = if adapter.dry_run {
                    "would publish"
                } else if adapter.synced {
                    "published + synced"
                } else {
                    "published"
                };
                table.add_row(vec![
                    Cell::new(&adapter.id).fg(comfy_table::Color::White),
                    Cell::new(&adapter.version).fg(comfy_table::Color::DarkGrey),
                    Cell::new(&adapter.code_key),
                    Cell::new(status).fg(comfy_table::Color::Green),
                ]);
            }
        }
    }

    println!("{}", table);
}

/// Prints a simple list of adapter directories (one per line).
pub fn print_adapter_list(dirs: &[String]) {
    if dirs.is_empty() {
        println!("  {} {}", "→".cyan(), "(none)".bright_black());
        return;
    }

    for dir in dirs {
        println!("  {} {}", "→".cyan(), dir.bold().white());
    }
}
