//! Migration file types

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which way a migration file moves the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Applies a change (`.up.sql`)
    Up,
    /// Reverts a change (`.down.sql`)
    Down,
}

impl Direction {
    /// File name suffix that marks a file with this direction
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Up => ".up.sql",
            Direction::Down => ".down.sql",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One migration step discovered on disk.
///
/// Files are rediscovered on every call and never mutated; the SQL is read
/// lazily with [`MigrationFile::read_sql`] and executed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Version decoded from the leading numeric token of the file name
    pub version: i64,

    /// Up or down
    pub direction: Direction,

    /// Location of the SQL file
    pub path: PathBuf,
}

impl MigrationFile {
    /// Base file name, e.g. `001_create_users.up.sql`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read the raw SQL text of the file
    pub fn read_sql(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
