//! Error types for mr-engine

use mr_core::CoreError;
use mr_db::DbError;
use std::path::PathBuf;
use thiserror::Error;

/// Engine errors.
///
/// Every variant raised inside a batch means the batch transaction was rolled
/// back; none of them carry a partial count.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration, discovery, or action error from mr-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Connection or transaction error from mr-db
    #[error(transparent)]
    Database(#[from] DbError),

    /// R001: Migration file could not be read
    #[error("[R001] Failed to read migration {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// R002: Migration SQL failed
    #[error("[R002] Migration {} (version {version}) failed: {source}", path.display())]
    Execute {
        path: PathBuf,
        version: i64,
        #[source]
        source: DbError,
    },

    /// R003: Recording or removing the ledger row failed
    #[error("[R003] Failed to update ledger for {} (version {version}): {source}", path.display())]
    Ledger {
        path: PathBuf,
        version: i64,
        #[source]
        source: DbError,
    },

    /// R004: Fewer down files on disk than migrations to revert
    #[error("[R004] Cannot revert {requested} migration(s): only {found} down file(s) available")]
    MissingDownFiles { requested: usize, found: usize },

    /// R005: Run was cancelled before it could commit
    #[error("[R005] Migration run cancelled; transaction rolled back")]
    Cancelled,
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
