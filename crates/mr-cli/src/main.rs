//! migrun CLI - file-based SQL schema migrations

use anyhow::{Context, Result};
use clap::Parser;
use mr_core::{ConfigFile, RunConfig};
use mr_engine::CancelFlag;
use tokio::signal;

mod cli;
mod logging;
mod report;

use cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let file = cli
        .config
        .as_deref()
        .map(ConfigFile::load)
        .transpose()
        .context("Failed to load config file")?;
    let config = RunConfig::resolve(
        cli.url.clone(),
        cli.dir.clone(),
        cli.action.clone(),
        file.as_ref(),
    )?;

    let cancel = CancelFlag::new();
    let watcher = tokio::spawn(cancel_on_signal(cancel.clone()));

    // The engine and its drivers are blocking
    let run_config = config.clone();
    let result = tokio::task::spawn_blocking(move || mr_engine::run(&run_config, cancel))
        .await
        .context("Migration task failed")?;
    watcher.abort();

    let outcome = result.with_context(|| {
        format!(
            "Migration '{}' failed in {}",
            config.action,
            config.migrations_dir.display()
        )
    })?;

    match cli.output {
        OutputFormat::Text => print!(
            "{}",
            report::render_text(&outcome, &config.migrations_dir)
        ),
        OutputFormat::Json => println!("{}", report::render_json(&outcome)?),
    }
    Ok(())
}

/// Raise `cancel` on Ctrl+C or SIGTERM so the engine rolls back at its next
/// step.
async fn cancel_on_signal(cancel: CancelFlag) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("Received shutdown signal, rolling back");
    cancel.cancel();
}
