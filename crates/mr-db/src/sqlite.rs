//! SQLite database backend implementation

use crate::dialect::{DatabaseConfig, DbType};
use crate::error::{DbError, DbResult};
use crate::traits::{Database, Executor, Transaction};
use rusqlite::{params, Connection};

/// SQLite database backend
pub struct SqliteBackend {
    conn: Connection,
    config: DatabaseConfig,
}

impl SqliteBackend {
    /// Create a new in-memory SQLite connection
    pub fn in_memory() -> DbResult<Self> {
        Self::open(DatabaseConfig::from_url("sqlite::memory:")?)
    }

    /// Open the file (or `:memory:`) named by `config.target`
    pub fn open(config: DatabaseConfig) -> DbResult<Self> {
        debug_assert_eq!(config.db_type, DbType::Sqlite);
        let conn = if config.is_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.target)
        }
        .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, config.target)))?;

        Ok(Self { conn, config })
    }
}

impl Executor for SqliteBackend {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        Ok(self.conn.execute(sql, params![version])?)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }
}

impl Database for SqliteBackend {
    fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

/// Open SQLite transaction; rolls back on drop unless committed
struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl Executor for SqliteTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.tx.execute_batch(sql)?;
        Ok(())
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        Ok(self.tx.execute(sql, params![version])?)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        Ok(self.tx.query_row(sql, [], |row| row.get(0))?)
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        self.tx
            .commit()
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.tx
            .rollback()
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
