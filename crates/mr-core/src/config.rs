//! Run configuration and the optional `migrun.yml` file

use crate::action::Action;
use crate::error::{CoreError, CoreResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from a YAML config file.
///
/// Every field is optional; values given on the command line or in the
/// environment take precedence.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Database connection URL
    #[serde(default)]
    pub database_url: Option<String>,

    /// Directory holding the `.up.sql` / `.down.sql` files
    #[serde(default)]
    pub migrations_dir: Option<PathBuf>,

    /// Default action when none is given
    #[serde(default)]
    pub action: Option<String>,
}

impl ConfigFile {
    /// Load a config file.
    ///
    /// A relative `migrations_dir` is resolved against the directory that
    /// contains the config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: ConfigFile =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if let (Some(dir), Some(base)) = (&config.migrations_dir, path.parent()) {
            if dir.is_relative() {
                config.migrations_dir = Some(base.join(dir));
            }
        }

        Ok(config)
    }
}

/// Everything a single migration run needs, resolved up front.
///
/// The engine receives this explicitly and never reads process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Database connection URL
    pub database_url: String,

    /// Directory holding the migration files
    pub migrations_dir: PathBuf,

    /// Action to perform
    pub action: Action,
}

impl RunConfig {
    /// Merge explicit values (flags or environment) over an optional config
    /// file and parse the action.
    ///
    /// The action is parsed here so grammar errors surface before any
    /// database work starts.
    pub fn resolve(
        database_url: Option<String>,
        migrations_dir: Option<PathBuf>,
        action: Option<String>,
        file: Option<&ConfigFile>,
    ) -> CoreResult<Self> {
        let file = file.cloned().unwrap_or_default();

        let database_url = non_empty(database_url)
            .or_else(|| non_empty(file.database_url))
            .ok_or(CoreError::MissingSetting {
                name: "database url",
                flag: "--url",
                env: "DATABASE_URL",
            })?;

        let migrations_dir = migrations_dir
            .filter(|p| !p.as_os_str().is_empty())
            .or(file.migrations_dir)
            .ok_or(CoreError::MissingSetting {
                name: "migrations directory",
                flag: "--dir",
                env: "MIGRATIONS",
            })?;

        let action = non_empty(action)
            .or_else(|| non_empty(file.action))
            .ok_or(CoreError::MissingSetting {
                name: "action",
                flag: "--action",
                env: "ACTION",
            })?;

        Ok(Self {
            database_url,
            migrations_dir,
            action: Action::parse(&action)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
