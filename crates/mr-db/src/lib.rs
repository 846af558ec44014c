//! mr-db - Database adapter layer for migrun
//!
//! This crate maps the engine's abstract persistence operations onto concrete
//! drivers. [`DatabaseConfig`] is the per-dialect dispatch table derived from
//! the connection URL; [`Database`] and [`Transaction`] are the only surface
//! the engine sees.

pub mod connect;
pub mod dialect;
pub mod duckdb;
pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod traits;

pub use crate::connect::connect;
pub use crate::dialect::{DatabaseConfig, DbType};
pub use crate::duckdb::DuckDbBackend;
pub use crate::error::{DbError, DbResult};
pub use crate::postgres::PostgresBackend;
pub use crate::sqlite::SqliteBackend;
pub use crate::traits::{Database, Executor, Transaction};
