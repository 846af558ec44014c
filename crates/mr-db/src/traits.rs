//! Database trait definitions

use crate::dialect::DatabaseConfig;
use crate::error::DbResult;

/// Statement execution shared by connections and open transactions
pub trait Executor {
    /// Execute SQL text as a single unit; it may hold several statements
    fn execute_batch(&mut self, sql: &str) -> DbResult<()>;

    /// Execute a statement with one integer bound to the dialect placeholder,
    /// returning affected rows
    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize>;

    /// Run a query that yields a single integer in its first row and column
    fn query_scalar(&mut self, sql: &str) -> DbResult<i64>;
}

/// A live connection to the migration target.
///
/// Methods take `&mut self`: a connection is owned by one engine call at a
/// time and is never shared between concurrent runs.
pub trait Database: Executor + Send {
    /// Dialect table this connection was opened with
    fn config(&self) -> &DatabaseConfig;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str {
        self.config().db_type.name()
    }

    /// Verify the server or file is reachable
    fn ping(&mut self) -> DbResult<()> {
        self.query_scalar("SELECT 1").map(|_| ())
    }

    /// Open a transaction.
    ///
    /// The returned handle borrows the connection until it is committed or
    /// rolled back; dropping it without either rolls back.
    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>>;
}

/// An open transaction
pub trait Transaction: Executor {
    /// Commit all work done through this handle
    fn commit(self: Box<Self>) -> DbResult<()>;

    /// Discard all work done through this handle
    fn rollback(self: Box<Self>) -> DbResult<()>;
}
