//! General output formatting utilities.

use std::time::Duration;

use owo_colors::OwoColorize;

/// Prints a summary box, aligning values after the longest key.
pub fn print_summary_box(title: &str, items: &[(&str, &str)]) {
    let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    println!("┌─ {} {}", title.cyan().bold(), "─".repeat(50).bright_black());
    for (key, value) in items {
        let padded = format!("{:<width$}", key, width = width);
        println!("│ {}  {}", padded.bright_black().bold(), value.bold().white());
    }
    println!("└{}", "─".repeat(60).bright_black());
}

/// Formats an elapsed time as `250ms`, `2.50s` or `1m 30.0s`.
pub fn format_duration(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    if seconds < 1.0 {
        format!("{}ms", elapsed.as_millis())
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        format!("{}m {:.1}s", elapsed.as_secs() / 60, seconds % 60.0)
    }
}
