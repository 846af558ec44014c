//! Bookkeeping for the `schema_migrations` table.
//!
//! The ledger holds one row per applied version. Every statement here goes
//! through whatever [`Executor`] the caller passes, so mutations land inside
//! the caller's batch transaction.

use mr_db::dialect::MIGRATIONS_TABLE;
use mr_db::{DatabaseConfig, DbResult, Executor};

/// Ledger statements rendered for one dialect
pub struct Ledger {
    check_table_sql: &'static str,
    create_table_sql: &'static str,
    max_version_sql: String,
    count_sql: String,
    insert_sql: String,
    delete_sql: String,
}

impl Ledger {
    /// Build the ledger statements for `config`'s dialect
    pub fn new(config: &DatabaseConfig) -> Self {
        let placeholder = config.placeholder;
        Self {
            check_table_sql: config.check_table_exists_sql,
            create_table_sql: config.create_table_sql,
            max_version_sql: format!("SELECT COALESCE(MAX(version), 0) FROM {MIGRATIONS_TABLE}"),
            count_sql: format!("SELECT COUNT(*) FROM {MIGRATIONS_TABLE}"),
            insert_sql: format!("INSERT INTO {MIGRATIONS_TABLE} (version) VALUES ({placeholder})"),
            delete_sql: format!("DELETE FROM {MIGRATIONS_TABLE} WHERE version = {placeholder}"),
        }
    }

    /// Create the table unless the dialect's existence check finds it
    pub fn ensure_table<E: Executor + ?Sized>(&self, exec: &mut E) -> DbResult<()> {
        if exec.query_scalar(self.check_table_sql)? > 0 {
            return Ok(());
        }
        log::debug!("Creating {MIGRATIONS_TABLE} table");
        exec.execute_batch(self.create_table_sql)
    }

    /// Highest applied version, 0 when the ledger is empty
    pub fn max_version<E: Executor + ?Sized>(&self, exec: &mut E) -> DbResult<i64> {
        exec.query_scalar(&self.max_version_sql)
    }

    /// Number of applied versions
    pub fn count<E: Executor + ?Sized>(&self, exec: &mut E) -> DbResult<i64> {
        exec.query_scalar(&self.count_sql)
    }

    /// Record `version` as applied
    pub fn insert<E: Executor + ?Sized>(&self, exec: &mut E, version: i64) -> DbResult<()> {
        exec.execute_with_version(&self.insert_sql, version)?;
        Ok(())
    }

    /// Remove `version` from the ledger
    pub fn delete<E: Executor + ?Sized>(&self, exec: &mut E, version: i64) -> DbResult<()> {
        exec.execute_with_version(&self.delete_sql, version)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
