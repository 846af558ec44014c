//! mr-engine - Migration engine for migrun
//!
//! Ties the file locator from `mr-core` to a connection from `mr-db`:
//! [`Engine`] executes status/up/down against one connection, and [`run`]
//! is the single entry point used by the CLI.

pub mod cancel;
pub mod engine;
pub mod error;
pub mod ledger;

pub use cancel::CancelFlag;
pub use engine::{Engine, Outcome};
pub use error::{EngineError, EngineResult};
pub use ledger::Ledger;

use mr_core::RunConfig;

/// Connect to `config.database_url` and execute `config.action`.
///
/// The migrations directory is checked before the connection opens, so a bad
/// path never touches the database.
pub fn run(config: &RunConfig, cancel: CancelFlag) -> EngineResult<Outcome> {
    mr_core::check_dir(&config.migrations_dir)?;

    let mut db = mr_db::connect(&config.database_url)?;
    log::info!(
        "Running '{}' on {} with migrations from {}",
        config.action,
        db.db_type(),
        config.migrations_dir.display()
    );

    Engine::new(db.as_mut())
        .with_cancel(cancel)
        .run(&config.migrations_dir, config.action)
}
