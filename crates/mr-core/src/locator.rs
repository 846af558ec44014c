//! Migration file discovery and ordering.
//!
//! Files are matched directly inside the source directory (no recursion) and
//! ordered by their path, compared byte-wise. With zero-padded version
//! prefixes this matches numeric order; unpadded prefixes (`9_x` vs `10_x`)
//! sort lexicographically and are not corrected here.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationFile};
use crate::version::parse_version;
use glob::Pattern;
use std::path::Path;

/// Confirm the migration source exists and is a directory.
///
/// Called before any database work so a mistyped path fails fast instead of
/// reading as "zero migrations".
pub fn check_dir(dir: &Path) -> CoreResult<()> {
    let meta = std::fs::metadata(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CoreError::DirectoryNotFound {
            path: dir.display().to_string(),
        },
        _ => CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        },
    })?;

    if !meta.is_dir() {
        return Err(CoreError::NotADirectory {
            path: dir.display().to_string(),
        });
    }
    Ok(())
}

/// List `.up.sql` files in ascending path order
pub fn list_up(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let mut files = discover(dir, Direction::Up)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// List `.down.sql` files in descending path order, keeping only the last `n`.
///
/// The tail of a descending list holds the `n` lowest versions, which is the
/// set that must be reverted when the ledger says `n` migrations are applied.
/// The returned files stay in descending order so the newest is reverted
/// first. When `n` exceeds the number of files, every file is returned.
pub fn list_down(dir: &Path, n: usize) -> CoreResult<Vec<MigrationFile>> {
    let mut files = discover(dir, Direction::Down)?;
    files.sort_by(|a, b| b.path.cmp(&a.path));
    let keep_from = files.len().saturating_sub(n);
    Ok(files.split_off(keep_from))
}

/// Glob the files for one direction and decode their versions.
fn discover(dir: &Path, direction: Direction) -> CoreResult<Vec<MigrationFile>> {
    let pattern = format!(
        "{}/*{}",
        Pattern::escape(&dir.to_string_lossy()),
        direction.suffix()
    );

    let entries = glob::glob(&pattern).map_err(|e| CoreError::MigrationGlob {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CoreError::MigrationGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        if !path.is_file() {
            log::debug!("Skipping non-file match {}", path.display());
            continue;
        }

        let version = parse_version(&path)?;
        if version <= 0 {
            return Err(CoreError::InvalidVersion {
                file: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                segment: version.to_string(),
            });
        }

        files.push(MigrationFile {
            version,
            direction,
            path,
        });
    }

    log::debug!(
        "Found {} {} migration file(s) in {}",
        files.len(),
        direction,
        dir.display()
    );
    Ok(files)
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
