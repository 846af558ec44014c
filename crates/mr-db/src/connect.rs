//! URL-driven backend selection

use crate::dialect::{DatabaseConfig, DbType};
use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::postgres::PostgresBackend;
use crate::sqlite::SqliteBackend;
use crate::traits::Database;

/// Open and ping a connection for `url`.
///
/// The dialect is resolved from the URL scheme before any I/O, so an
/// unsupported scheme never reaches a driver.
pub fn connect(url: &str) -> DbResult<Box<dyn Database>> {
    let config = DatabaseConfig::from_url(url)?;
    log::debug!(
        "Connecting to {} database at {}",
        config.db_type,
        config.display_target()
    );

    let mut db: Box<dyn Database> = match config.db_type {
        DbType::Postgres => Box::new(PostgresBackend::open(config)?),
        DbType::Sqlite => Box::new(SqliteBackend::open(config)?),
        DbType::DuckDb => Box::new(DuckDbBackend::open(config)?),
    };

    db.ping().map_err(|e| match e {
        e @ DbError::ConnectionError(_) => e,
        other => DbError::ConnectionError(other.to_string()),
    })?;
    log::debug!("Connected ({})", db.db_type());

    Ok(db)
}

#[cfg(test)]
#[path = "connect_test.rs"]
mod tests;
