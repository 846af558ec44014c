//! Rendering of engine outcomes for the terminal

use anyhow::{Context, Result};
use mr_core::{Action, MigrationFile};
use mr_engine::Outcome;
use std::path::Path;

const SEPARATOR: &str = "--------------------------------------------";

/// Human-readable report of `outcome` for migrations in `dir`
pub(crate) fn render_text(outcome: &Outcome, dir: &Path) -> String {
    let mut lines = Vec::new();

    match outcome.action {
        Action::Status => {
            lines.push("Migration status".to_string());
            lines.push(SEPARATOR.to_string());
            lines.push(format!("Checking migrations in: {}", dir.display()));
            if outcome.count == 0 {
                lines.push("All migrations are up to date. No pending migrations.".to_string());
                return finish(lines);
            }
            lines.push(format!("Pending migrations: {}", outcome.count));
        }
        Action::Up { .. } | Action::Down { .. } => {
            let direction = outcome.action.name().to_uppercase();
            lines.push(format!("Migration execution: {direction}"));
            lines.push(SEPARATOR.to_string());
            lines.push(format!("Location: {}", dir.display()));
            if outcome.count == 0 {
                lines.push("No migrations to execute".to_string());
                return finish(lines);
            }
            lines.push(format!("Executed: {} migration(s)", outcome.count));
        }
    }

    lines.push(SEPARATOR.to_string());
    for (i, file) in outcome.files.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, file_line(file)));
    }
    finish(lines)
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Pretty-printed JSON of `outcome`
pub(crate) fn render_json(outcome: &Outcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).context("Failed to serialize migration report")
}

fn file_line(file: &MigrationFile) -> String {
    match file_size(file.path()) {
        Some(bytes) => format!("{} ({})", file.file_name(), format_file_size(bytes)),
        None => file.file_name(),
    }
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|meta| meta.len())
}

/// Size in bytes, KB, or MB with one decimal
pub(crate) fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{bytes} bytes")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
