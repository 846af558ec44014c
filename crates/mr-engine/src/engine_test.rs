use super::*;
use mr_core::{CoreError, Direction};
use mr_db::{DatabaseConfig, DbResult, Executor, SqliteBackend};
use std::fs;
use tempfile::tempdir;

fn write_pair(dir: &Path, name: &str, up: &str, down: &str) {
    fs::write(dir.join(format!("{name}.up.sql")), up).unwrap();
    fs::write(dir.join(format!("{name}.down.sql")), down).unwrap();
}

fn write_tables(dir: &Path, names: &[&str]) {
    for (i, table) in names.iter().enumerate() {
        write_pair(
            dir,
            &format!("{:03}_create_{table}", i + 1),
            &format!("CREATE TABLE {table} (id INTEGER);"),
            &format!("DROP TABLE {table};"),
        );
    }
}

/// SQLite connection that raises `cancel` once a transaction has run SQL
struct CancelMidBatch {
    inner: SqliteBackend,
    cancel: CancelFlag,
}

impl CancelMidBatch {
    fn new(cancel: CancelFlag) -> Self {
        Self {
            inner: SqliteBackend::in_memory().unwrap(),
            cancel,
        }
    }
}

impl Executor for CancelMidBatch {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        self.inner.execute_with_version(sql, version)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        self.inner.query_scalar(sql)
    }
}

impl Database for CancelMidBatch {
    fn config(&self) -> &DatabaseConfig {
        self.inner.config()
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let cancel = self.cancel.clone();
        let inner = self.inner.begin()?;
        Ok(Box::new(CancellingTransaction { inner, cancel }))
    }
}

struct CancellingTransaction<'a> {
    inner: Box<dyn Transaction + 'a>,
    cancel: CancelFlag,
}

impl Executor for CancellingTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)?;
        self.cancel.cancel();
        Ok(())
    }

    fn execute_with_version(&mut self, sql: &str, version: i64) -> DbResult<usize> {
        self.inner.execute_with_version(sql, version)
    }

    fn query_scalar(&mut self, sql: &str) -> DbResult<i64> {
        self.inner.query_scalar(sql)
    }
}

impl Transaction for CancellingTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        self.inner.commit()
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.inner.rollback()
    }
}

fn table_exists(db: &mut SqliteBackend, name: &str) -> bool {
    let sql = format!("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='{name}'");
    db.query_scalar(&sql).unwrap() > 0
}

fn max_version(db: &mut SqliteBackend) -> i64 {
    db.query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
        .unwrap()
}

#[test]
fn test_status_on_fresh_database() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db).status(dir.path()).unwrap();
    assert_eq!(outcome.action, Action::Status);
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.files.len(), 2);
    assert!(outcome.files.iter().all(|f| f.direction == Direction::Up));
    assert!(table_exists(&mut db, "schema_migrations"));
}

#[test]
fn test_up_applies_all_in_order() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts", "tags"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db).up(dir.path(), 0).unwrap();
    assert_eq!(outcome.count, 3);
    assert_eq!(
        outcome.files.iter().map(|f| f.version).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(table_exists(&mut db, "users"));
    assert!(table_exists(&mut db, "tags"));
    assert_eq!(max_version(&mut db), 3);
}

#[test]
fn test_up_with_limit() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts", "tags"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db).up(dir.path(), 2).unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.action, Action::Up { limit: 2 });
    assert!(!table_exists(&mut db, "tags"));
    assert_eq!(max_version(&mut db), 2);
}

#[test]
fn test_up_limit_beyond_pending_is_bounded() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db).up(dir.path(), 10).unwrap();
    assert_eq!(outcome.count, 1);
}

#[test]
fn test_up_when_nothing_pending() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    Engine::new(&mut db).up(dir.path(), 0).unwrap();
    let outcome = Engine::new(&mut db).up(dir.path(), 0).unwrap();
    assert_eq!(outcome.count, 0);
    assert!(outcome.files.is_empty());
}

#[test]
fn test_up_failure_rolls_back_whole_batch() {
    let dir = tempdir().unwrap();
    write_pair(dir.path(), "001_ok", "CREATE TABLE ok (id INTEGER);", "DROP TABLE ok;");
    write_pair(dir.path(), "002_bad", "CREATE TABLE invalid_syntax error;", "SELECT 1;");
    let mut db = SqliteBackend::in_memory().unwrap();

    let err = Engine::new(&mut db).up(dir.path(), 0).unwrap_err();
    match err {
        EngineError::Execute { path, version, .. } => {
            assert_eq!(version, 2);
            assert!(path.ends_with("002_bad.up.sql"));
        }
        other => panic!("Expected Execute, got {other:?}"),
    }
    assert!(!table_exists(&mut db, "ok"));
    assert_eq!(max_version(&mut db), 0);
}

#[test]
fn test_down_reverts_newest_first() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts", "tags"]);
    let mut db = SqliteBackend::in_memory().unwrap();
    Engine::new(&mut db).up(dir.path(), 0).unwrap();

    let outcome = Engine::new(&mut db).down(dir.path(), 1).unwrap();
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.files[0].version, 3);
    assert_eq!(outcome.files[0].direction, Direction::Down);
    assert!(!table_exists(&mut db, "tags"));
    assert!(table_exists(&mut db, "posts"));
    assert_eq!(max_version(&mut db), 2);
}

#[test]
fn test_down_limit_clamped_to_applied() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts", "tags"]);
    let mut db = SqliteBackend::in_memory().unwrap();
    Engine::new(&mut db).up(dir.path(), 2).unwrap();

    let outcome = Engine::new(&mut db).down(dir.path(), 10).unwrap();
    assert_eq!(
        outcome.files.iter().map(|f| f.version).collect::<Vec<_>>(),
        vec![2, 1]
    );
    assert_eq!(max_version(&mut db), 0);
}

#[test]
fn test_down_on_empty_ledger() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db).down(dir.path(), 0).unwrap();
    assert_eq!(outcome.count, 0);
}

#[test]
fn test_down_missing_files_fails_before_sql() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts"]);
    let mut db = SqliteBackend::in_memory().unwrap();
    Engine::new(&mut db).up(dir.path(), 0).unwrap();
    fs::remove_file(dir.path().join("001_create_users.down.sql")).unwrap();

    let err = Engine::new(&mut db).down(dir.path(), 0).unwrap_err();
    assert!(matches!(
        err,
        EngineError::MissingDownFiles {
            requested: 2,
            found: 1
        }
    ));
    assert!(table_exists(&mut db, "posts"));
    assert_eq!(max_version(&mut db), 2);
}

#[test]
fn test_down_missing_newest_file_fails_before_sql() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts", "tags"]);
    let mut db = SqliteBackend::in_memory().unwrap();
    Engine::new(&mut db).up(dir.path(), 0).unwrap();
    fs::remove_file(dir.path().join("003_create_tags.down.sql")).unwrap();

    let err = Engine::new(&mut db).down(dir.path(), 1).unwrap_err();
    assert!(matches!(
        err,
        EngineError::MissingDownFiles {
            requested: 3,
            found: 2
        }
    ));
    assert!(table_exists(&mut db, "posts"));
    assert!(table_exists(&mut db, "tags"));
    assert_eq!(max_version(&mut db), 3);
    assert_eq!(
        db.query_scalar("SELECT COUNT(*) FROM schema_migrations").unwrap(),
        3
    );
}

#[test]
fn test_cancelled_between_files_rolls_back() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users", "posts"]);
    let cancel = CancelFlag::new();
    let mut db = CancelMidBatch::new(cancel.clone());

    let err = Engine::new(&mut db)
        .with_cancel(cancel.clone())
        .up(dir.path(), 0)
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
    assert!(cancel.is_cancelled());
    assert!(!table_exists(&mut db.inner, "users"));
    assert!(!table_exists(&mut db.inner, "posts"));
    assert_eq!(max_version(&mut db.inner), 0);
}

#[test]
fn test_cancelled_before_commit_rolls_back() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let cancel = CancelFlag::new();
    let mut db = CancelMidBatch::new(cancel.clone());

    let err = Engine::new(&mut db)
        .with_cancel(cancel)
        .up(dir.path(), 0)
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
    assert!(!table_exists(&mut db.inner, "users"));
    assert_eq!(max_version(&mut db.inner), 0);
}

#[test]
fn test_cancelled_before_begin() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();
    let err = Engine::new(&mut db)
        .with_cancel(cancel)
        .up(dir.path(), 0)
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
    assert!(!table_exists(&mut db, "users"));
    assert_eq!(max_version(&mut db), 0);
}

#[test]
fn test_unreadable_file_is_read_error() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    // Not valid UTF-8
    fs::write(dir.path().join("001_create_users.up.sql"), b"\xff\xfe\xfd").unwrap();
    let mut db = SqliteBackend::in_memory().unwrap();

    let err = Engine::new(&mut db).up(dir.path(), 0).unwrap_err();
    assert!(matches!(err, EngineError::ReadFile { .. }));
}

#[test]
fn test_missing_directory() {
    let dir = tempdir().unwrap();
    let mut db = SqliteBackend::in_memory().unwrap();

    let err = Engine::new(&mut db)
        .status(&dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::DirectoryNotFound { .. })
    ));
}

#[test]
fn test_run_dispatches_action() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();

    let outcome = Engine::new(&mut db)
        .run(dir.path(), Action::parse("up 1").unwrap())
        .unwrap();
    assert_eq!(outcome.count, 1);
    let outcome = Engine::new(&mut db)
        .run(dir.path(), Action::parse("status").unwrap())
        .unwrap();
    assert_eq!(outcome.count, 0);
}

#[test]
fn test_status_with_more_rows_than_files() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), &["users"]);
    let mut db = SqliteBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE schema_migrations (version INTEGER PRIMARY KEY);
         INSERT INTO schema_migrations VALUES (1), (2), (3);",
    )
    .unwrap();

    let outcome = Engine::new(&mut db).status(dir.path()).unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.files.len(), 1);
}
