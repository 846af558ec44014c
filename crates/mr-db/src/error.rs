//! Error types for mr-db

use thiserror::Error;

/// Database adapter errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection or ping failed (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Connection URL could not be parsed (D003)
    #[error("[D003] Invalid database URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// URL scheme has no backend (D004)
    #[error("[D004] Unsupported database scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// BEGIN / COMMIT / ROLLBACK failed (D005)
    #[error("[D005] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<postgres::Error> for DbError {
    fn from(err: postgres::Error) -> Self {
        // The top-level Display is just "db error"; the server message lives
        // in the DbError source.
        match err.as_db_error() {
            Some(db) => DbError::ExecutionError(format!("{}: {}", db.code().code(), db.message())),
            None => DbError::ExecutionError(err.to_string()),
        }
    }
}
