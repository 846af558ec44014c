//! Error types for mr-core

use thiserror::Error;

/// Core error type for migrun
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: A required setting was not provided anywhere
    #[error("[E003] Missing required setting '{name}': pass {flag} or set {env}")]
    MissingSetting {
        name: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    /// L001: Migration source directory does not exist
    #[error("[L001] Migration directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// L002: Migration source is not a directory
    #[error("[L002] Migration source is not a directory: {path}")]
    NotADirectory { path: String },

    /// L003: Glob pattern or directory scan failed
    #[error("[L003] Failed to list migration files with '{pattern}': {message}")]
    MigrationGlob { pattern: String, message: String },

    /// L004: File name does not start with a positive numeric version
    #[error("[L004] Invalid migration version in '{file}': '{segment}' is not a positive integer")]
    InvalidVersion { file: String, segment: String },

    /// A001: Action string is empty
    #[error("[A001] Action cannot be empty")]
    EmptyAction,

    /// A002: First token is not a known action
    #[error("[A002] Unknown action: {action}")]
    UnknownAction { action: String },

    /// A003: Wrong number of tokens for the action
    #[error("[A003] Action '{action}' accepts {expected}, got: {input}")]
    ActionArity {
        action: String,
        expected: &'static str,
        input: String,
    },

    /// A004: Migration count is not a non-negative integer
    #[error("[A004] Invalid migration count '{value}': expected a non-negative integer")]
    InvalidCount { value: String },

    /// IO error with the file that caused it
    #[error("IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
