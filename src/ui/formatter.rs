//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are unit tested; `display_*`
//! functions print it with `console` styles.

use console::style;
use toml::{Table, Value};

use crate::boundary::BoundaryWarning;
use crate::domain::BranchCategory;
use crate::engine::{BranchEntry, FinishReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One listing line: current marker, identifier, and status when known
pub fn format_branch_entry(entry: &BranchEntry) -> String {
    let marker = if entry.is_current { "*" } else { " " };
    match &entry.status {
        Some(status) => format!("{} {} ({})", marker, entry.branch.identifier, status),
        None => format!("{} {}", marker, entry.branch.identifier),
    }
}

/// Display the branches of a category, or a hint when there are none
pub fn display_branch_list(category: BranchCategory, entries: &[BranchEntry]) {
    if entries.is_empty() {
        display_status(&format!(
            "No {0} branches exist. Start one with: git-flow branch {0} start <name>",
            category
        ));
        return;
    }

    for entry in entries {
        let line = format_branch_entry(entry);
        if entry.is_current {
            println!("{}", style(line).green());
        } else {
            println!("{}", line);
        }
    }
}

/// Summary lines for a finished branch
pub fn format_finish_report(report: &FinishReport) -> Vec<String> {
    let mut lines = Vec::new();
    for target in &report.merged_into {
        lines.push(format!("Merged '{}' into '{}'", report.branch, target));
    }
    if let Some(tag) = &report.tag {
        lines.push(format!("Tagged release '{}'", tag));
    }
    if report.deleted {
        lines.push(format!("Deleted branch '{}'", report.branch));
    } else {
        lines.push(format!("Kept branch '{}'", report.branch));
    }
    if report.pushed {
        lines.push("Pushed to remote".to_string());
    }
    lines
}

pub fn display_finish_report(report: &FinishReport) {
    for warning in &report.warnings {
        display_boundary_warning(warning);
    }
    for line in format_finish_report(report) {
        display_success(&line);
    }
}

/// Render a config value the way it is written in the file
pub fn format_config_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Table(table) => toml::to_string_pretty(table).unwrap_or_else(|_| value.to_string()),
        other => other.to_string(),
    }
}

/// Display a whole configuration table
pub fn display_config(table: &Table) {
    match toml::to_string_pretty(table) {
        Ok(text) => print!("{}", text),
        Err(e) => display_error(&format!("cannot render configuration: {}", e)),
    }
}
