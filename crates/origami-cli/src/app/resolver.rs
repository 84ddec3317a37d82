//! Path resolution for config and journal files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, OrigamiConfig};
use crate::constants::env_vars;
use crate::errors::CliError;

/// Resolve the config file path, checking ORIGAMI_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the journal database path from `--db` or the config file.
pub fn resolve_journal_path(cli: &Cli, config: Option<&OrigamiConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.as_deref() {
        return Ok(PathBuf::from(path));
    }

    match config {
        Some(config) => Ok(PathBuf::from(&config.journal.path)),
        None => {
            let config_path = resolve_config_path()?;
            Err(CliError::not_found(
                missing_config_message(&config_path),
                "Hint: Run `origami init`, or pass --db <PATH>.",
            )
            .into())
        }
    }
}

/// Error message when the journal database is missing.
pub fn missing_journal_message(path: &Path) -> String {
    format!("No journal found at {}", path.display())
}

/// Error message when config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No config found at {}", config_path.display())
}
