//! Version codec: decodes the numeric version carried in a migration file name.

use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Parse the version from a migration file path.
///
/// The version is the first `_`-separated segment of the file's base name,
/// so `migrations/0042_add_users.up.sql` decodes to `42`. A segment that is
/// not an integer is reported as [`CoreError::InvalidVersion`]; a literal
/// `0` decodes to `Ok(0)` and is left for the caller to judge.
pub fn parse_version(path: &Path) -> CoreResult<i64> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let segment = file.split('_').next().unwrap_or_default();

    segment
        .parse::<i64>()
        .map_err(|_| CoreError::InvalidVersion {
            file: file.clone(),
            segment: segment.to_string(),
        })
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
