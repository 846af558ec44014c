//! mr-core - Core library for migrun
//!
//! This crate provides the pieces of the migration runner that never touch a
//! database: decoding versions from file names, discovering and ordering
//! migration files, parsing action strings, and resolving run configuration.

pub mod action;
pub mod config;
pub mod error;
pub mod locator;
pub mod migration;
pub mod version;

pub use action::Action;
pub use config::{ConfigFile, RunConfig};
pub use error::{CoreError, CoreResult};
pub use locator::{check_dir, list_down, list_up};
pub use migration::{Direction, MigrationFile};
pub use version::parse_version;
