//! Change detection command.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::formatting::{print_adapter_list, print_section_header, SectionStyle};
use crate::SourceArgs;

use super::resolve_changes;

pub fn cmd_detect(adapters_dir: &Path, source: &SourceArgs, json: bool) -> Result<()> {
    let changes = resolve_changes(adapters_dir, Vec::new(), source)?;
    let dirs: Vec<String> = changes
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&dirs)?);
        return Ok(());
    }

    print_section_header("[Changed Adapters]", SectionStyle::Primary);

    if dirs.is_empty() {
        println!("  {} No adapters changed", "OK".green());
    } else {
        println!(
            "  {} {} {}",
            "OK".green(),
            dirs.len().to_string().bold().cyan(),
            "adapters changed".bold()
        );
        println!();
        print_adapter_list(&dirs);
    }
    println!();

    Ok(())
}
