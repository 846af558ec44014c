//! The migration state machine.
//!
//! Nothing is remembered between calls: each call re-reads the ledger and
//! re-lists the directory. Up and down batches run in a single transaction
//! that either commits every file or rolls back all of them.
//!
//! The up cursor is positional. The highest applied version is used as an
//! index into the sorted up-file list, which is only correct while versions
//! are contiguous from 1 and every file is applied in order.

use crate::cancel::CancelFlag;
use crate::error::{EngineError, EngineResult};
use crate::ledger::Ledger;
use mr_core::{check_dir, list_down, list_up, Action, MigrationFile};
use mr_db::{Database, Executor, Transaction};
use serde::Serialize;
use std::path::Path;

/// Result of a successful engine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The action that produced this outcome
    pub action: Action,

    /// Pending migrations (status), or files applied/reverted (up/down)
    pub count: usize,

    /// The files counted above, in execution or report order
    pub files: Vec<MigrationFile>,
}

impl Outcome {
    fn new(action: Action, files: Vec<MigrationFile>) -> Self {
        Self {
            action,
            count: files.len(),
            files,
        }
    }
}

/// Runs actions against one exclusively borrowed connection
pub struct Engine<'db> {
    db: &'db mut dyn Database,
    ledger: Ledger,
    cancel: CancelFlag,
}

impl<'db> Engine<'db> {
    /// Create an engine over `db`
    pub fn new(db: &'db mut dyn Database) -> Self {
        let ledger = Ledger::new(db.config());
        Self {
            db,
            ledger,
            cancel: CancelFlag::new(),
        }
    }

    /// Poll `cancel` between steps of a batch
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Dispatch a parsed action
    pub fn run(&mut self, dir: &Path, action: Action) -> EngineResult<Outcome> {
        match action {
            Action::Status => self.status(dir),
            Action::Up { limit } => self.up(dir, limit),
            Action::Down { limit } => self.down(dir, limit),
        }
    }

    /// Report pending up files.
    ///
    /// The count is `|files on disk - ledger rows|` and the files are the
    /// trailing slice of the up list. When the ledger holds more rows than
    /// there are files, every file is returned and the count stays the
    /// difference.
    pub fn status(&mut self, dir: &Path) -> EngineResult<Outcome> {
        self.prepare(dir)?;
        let applied = self.ledger.count(&mut *self.db)?;
        let up = list_up(dir)?;

        let diff = up.len() as i64 - applied;
        if diff == 0 {
            return Ok(Outcome::new(Action::Status, Vec::new()));
        }

        let count = usize::try_from(diff.unsigned_abs()).unwrap_or(usize::MAX);
        let files = up[up.len().saturating_sub(count)..].to_vec();
        Ok(Outcome {
            action: Action::Status,
            count,
            files,
        })
    }

    /// Apply up to `limit` pending files in ascending order (0 = all pending)
    pub fn up(&mut self, dir: &Path, limit: usize) -> EngineResult<Outcome> {
        self.prepare(dir)?;

        let applied = self.in_transaction(|tx, ledger, cancel| {
            let start = usize::try_from(ledger.max_version(&mut *tx)?).unwrap_or(0);
            let files = list_up(dir)?;

            let n = if limit > 0 {
                limit
            } else {
                files.len().saturating_sub(start)
            };
            let first = start.min(files.len());
            let last = start.saturating_add(n).min(files.len());

            let mut applied = Vec::with_capacity(last - first);
            for file in &files[first..last] {
                check_cancel(cancel)?;
                execute_file(tx, file)?;
                ledger
                    .insert(&mut *tx, file.version)
                    .map_err(|source| EngineError::Ledger {
                        path: file.path.clone(),
                        version: file.version,
                        source,
                    })?;
                log::debug!("Applied {}", file.file_name());
                applied.push(file.clone());
            }
            Ok(applied)
        })?;

        log::info!("Applied {} migration(s)", applied.len());
        Ok(Outcome::new(Action::Up { limit }, applied))
    }

    /// Revert up to `limit` applied files, newest first (0 = all applied)
    pub fn down(&mut self, dir: &Path, limit: usize) -> EngineResult<Outcome> {
        self.prepare(dir)?;

        let reverted = self.in_transaction(|tx, ledger, cancel| {
            let n_applied = usize::try_from(ledger.max_version(&mut *tx)?).unwrap_or(0);
            let limit = if limit == 0 {
                n_applied
            } else {
                limit.min(n_applied)
            };

            // Every applied version needs its down file, or the tail slice
            // shifts onto older versions.
            let files = list_down(dir, n_applied)?;
            if files.len() < n_applied {
                return Err(EngineError::MissingDownFiles {
                    requested: n_applied,
                    found: files.len(),
                });
            }

            let mut reverted = Vec::with_capacity(limit);
            for file in files.into_iter().take(limit) {
                check_cancel(cancel)?;
                execute_file(tx, &file)?;
                ledger
                    .delete(&mut *tx, file.version)
                    .map_err(|source| EngineError::Ledger {
                        path: file.path.clone(),
                        version: file.version,
                        source,
                    })?;
                log::debug!("Reverted {}", file.file_name());
                reverted.push(file);
            }
            Ok(reverted)
        })?;

        log::info!("Reverted {} migration(s)", reverted.len());
        Ok(Outcome::new(Action::Down { limit }, reverted))
    }

    /// Validate the source directory and make sure the ledger table exists
    fn prepare(&mut self, dir: &Path) -> EngineResult<()> {
        check_dir(dir)?;
        self.ledger.ensure_table(&mut *self.db)?;
        Ok(())
    }

    /// Execute `body` within one transaction, rolling back on error or
    /// cancellation.
    fn in_transaction<T, F>(&mut self, body: F) -> EngineResult<T>
    where
        F: FnOnce(&mut dyn Transaction, &Ledger, &CancelFlag) -> EngineResult<T>,
    {
        check_cancel(&self.cancel)?;
        let mut tx = self.db.begin()?;

        let result = body(tx.as_mut(), &self.ledger, &self.cancel).and_then(|value| {
            check_cancel(&self.cancel)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                log::info!("Rolling back: {err}");
                if let Err(rollback_err) = tx.rollback() {
                    log::warn!("Rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}

fn check_cancel(cancel: &CancelFlag) -> EngineResult<()> {
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    Ok(())
}

/// Read one file and run its SQL verbatim inside `tx`
fn execute_file(tx: &mut dyn Transaction, file: &MigrationFile) -> EngineResult<()> {
    let sql = file.read_sql().map_err(|source| EngineError::ReadFile {
        path: file.path.clone(),
        source,
    })?;
    tx.execute_batch(&sql)
        .map_err(|source| EngineError::Execute {
            path: file.path.clone(),
            version: file.version,
            source,
        })
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
