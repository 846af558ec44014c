//! Per-dialect SQL text, resolved once from the connection URL

use crate::error::{DbError, DbResult};
use std::fmt;
use url::Url;

/// Name of the ledger table. Part of the persisted contract.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// Database product selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbType {
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
    /// DuckDB
    DuckDb,
}

impl DbType {
    /// Identifier used in logs and reports
    pub fn name(self) -> &'static str {
        match self {
            DbType::Postgres => "postgres",
            DbType::Sqlite => "sqlite",
            DbType::DuckDb => "duckdb",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dialect dispatch table.
///
/// Built once per connection by [`DatabaseConfig::from_url`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Which backend handles the connection
    pub db_type: DbType,

    /// Token for the single bound parameter (`$1` or `?`)
    pub placeholder: &'static str,

    /// Query returning a count > 0 when the ledger table exists
    pub check_table_exists_sql: &'static str,

    /// Idempotent ledger table creation
    pub create_table_sql: &'static str,

    /// What the driver opens: a file path, `:memory:`, or a full connection URL
    pub target: String,
}

impl DatabaseConfig {
    /// Resolve the dialect from a connection URL.
    ///
    /// Accepted forms:
    /// - `postgres://…` / `postgresql://…`
    /// - `sqlite::memory:`, `sqlite:///abs/path.db`, `sqlite://rel/path.db`
    /// - `duckdb::memory:`, `duckdb:///abs/path.duckdb`, `duckdb://rel/path.duckdb`
    pub fn from_url(url: &str) -> DbResult<Self> {
        match url {
            "sqlite::memory:" => return Ok(Self::sqlite(":memory:".to_string())),
            "duckdb::memory:" => return Ok(Self::duckdb(":memory:".to_string())),
            _ => {}
        }

        let parsed = Url::parse(url).map_err(|e| DbError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        match parsed.scheme().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::postgres(url.to_string())),
            "sqlite" => Ok(Self::sqlite(file_target(url, &parsed)?)),
            "duckdb" => Ok(Self::duckdb(file_target(url, &parsed)?)),
            other => Err(DbError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    fn postgres(target: String) -> Self {
        Self {
            db_type: DbType::Postgres,
            placeholder: "$1",
            check_table_exists_sql: "SELECT count(*) FROM information_schema.tables WHERE table_name = 'schema_migrations'",
            create_table_sql: "CREATE TABLE IF NOT EXISTS schema_migrations (version bigint NOT NULL, CONSTRAINT schema_migrations_pkey PRIMARY KEY (version))",
            target,
        }
    }

    fn sqlite(target: String) -> Self {
        Self {
            db_type: DbType::Sqlite,
            placeholder: "?",
            check_table_exists_sql: "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='schema_migrations'",
            create_table_sql: "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY)",
            target,
        }
    }

    fn duckdb(target: String) -> Self {
        Self {
            db_type: DbType::DuckDb,
            placeholder: "?",
            check_table_exists_sql: "SELECT count(*) FROM information_schema.tables WHERE table_name = 'schema_migrations'",
            create_table_sql: "CREATE TABLE IF NOT EXISTS schema_migrations (version BIGINT PRIMARY KEY)",
            target,
        }
    }

    /// Whether the target is an in-memory database
    pub fn is_memory(&self) -> bool {
        self.target == ":memory:"
    }

    /// Target safe to print: file targets as-is, server URLs without credentials
    pub fn display_target(&self) -> String {
        match self.db_type {
            DbType::Postgres => match Url::parse(&self.target) {
                Ok(mut url) => {
                    let _ = url.set_password(None);
                    url.to_string()
                }
                Err(_) => "postgres".to_string(),
            },
            DbType::Sqlite | DbType::DuckDb => self.target.clone(),
        }
    }
}

/// File path carried by a `sqlite://` or `duckdb://` URL.
///
/// `scheme:///abs/path` has an empty host and yields `/abs/path`;
/// `scheme://rel/path` puts the first segment in the host and yields `rel/path`.
fn file_target(url: &str, parsed: &Url) -> DbResult<String> {
    let target = format!("{}{}", parsed.host_str().unwrap_or(""), parsed.path());
    if target.is_empty() {
        return Err(DbError::InvalidUrl {
            url: url.to_string(),
            message: "missing database file path".to_string(),
        });
    }
    Ok(target)
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
