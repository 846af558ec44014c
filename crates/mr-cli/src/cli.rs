//! CLI argument definitions using clap derive API

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// migrun - apply, revert, and report file-based SQL migrations
#[derive(Parser, Debug)]
#[command(name = "migrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database connection URL (postgres://, sqlite://, sqlite::memory:, duckdb://)
    #[arg(short, long, env = "DATABASE_URL", hide_env_values = true)]
    pub url: Option<String>,

    /// Directory containing <version>_<name>.up.sql / .down.sql files
    #[arg(short, long, env = "MIGRATIONS")]
    pub dir: Option<PathBuf>,

    /// Action to run: "status", "up", "up <N>", "down", "down <N>"
    #[arg(short, long, env = "ACTION")]
    pub action: Option<String>,

    /// YAML config file supplying defaults for the options above
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Report output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable numbered list
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
