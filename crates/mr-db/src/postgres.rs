//! PostgreSQL database backend implementation

use crate::dialect::{DatabaseConfig, DbType};
use crate::error::{DbError, DbResult};
use crate::traits::{Database, Executor, Transaction};
use postgres::{Client, NoTls};

/// PostgreSQL database backend over a blocking client
pub struct PostgresBackend {
    client: Client,
    config: DatabaseConfig,
}

impl PostgresBackend {
    /// Connect using the full URL in `config.target`
    pub fn open(config: DatabaseConfig) -> DbResult<Self> {
        debug_assert_eq!(config.db_type, DbType::Postgres);
        let client = Client::connect(&config.target, NoTls).map_err(|e| {
            DbError::ConnectionError(format!("{}: {}", e, config.display_target()))
        })?;

        Ok(Self { client, config })
    }
}

fn query_i64<C: postgres::GenericClient>(client: &mut C, sql: &str) -> DbResult<i64> {
    let row = client.query_one(sql, &[])?;
    Ok(row.try_get::<_, i64>(0)?)
}

impl Executor for PostgresBackend {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.client.batch_execute(sql)?;
        Ok(())
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        Ok(self.client.execute(sql, &[&version])? as usize)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        query_i64(&mut self.client, sql)
    }
}

impl Database for PostgresBackend {
    fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    // `SELECT 1` yields int4, which query_scalar would refuse as i64
    fn ping(&mut self) -> DbResult<()> {
        self.client
            .batch_execute("SELECT 1")
            .map_err(|e| DbError::ConnectionError(e.to_string()))
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .client
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction<'conn> {
    tx: postgres::Transaction<'conn>,
}

impl Executor for PostgresTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.tx.batch_execute(sql)?;
        Ok(())
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        Ok(self.tx.execute(sql, &[&version])? as usize)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        query_i64(&mut self.tx, sql)
    }
}

impl Transaction for PostgresTransaction<'_> {
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
