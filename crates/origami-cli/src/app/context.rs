//! Application context for the Origami CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::io::IsTerminal;
use std::path::PathBuf;

use once_cell::unsync::OnceCell;
use origami_core::{GuardConfig, JournalGuard, SqliteStore};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{read_config, OrigamiConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{missing_journal_message, resolve_config_path, resolve_journal_path};
use super::unlock::unlock_with_retry;

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<OrigamiConfig>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self) -> bool {
        !self.cli.no_input && std::io::stdin().is_terminal()
    }

    /// UI context for a command, honoring the global color/ascii flags.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// The config file, loaded once. `None` when it does not exist.
    pub fn config(&self) -> anyhow::Result<Option<&OrigamiConfig>> {
        let config = self.config.get_or_try_init(|| -> anyhow::Result<_> {
            let path = resolve_config_path()?;
            if !path.exists() {
                debug!(path = %path.display(), "no config file");
                return Ok(None);
            }
            read_config(&path).map(Some)
        })?;
        Ok(config.as_ref())
    }

    pub fn journal_path(&self) -> anyhow::Result<PathBuf> {
        resolve_journal_path(self.cli, self.config()?)
    }

    /// Guard settings from config, or defaults when there is none.
    pub fn guard_config(&self) -> anyhow::Result<GuardConfig> {
        match self.config()? {
            Some(config) => config.guard_config(),
            None => Ok(GuardConfig::default()),
        }
    }

    /// Open the journal without unlocking it.
    pub fn open_guard(&self) -> anyhow::Result<JournalGuard<SqliteStore>> {
        let path = self.journal_path()?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_journal_message(&path),
                "Hint: Run `origami init` to create a journal.",
            )
            .into());
        }

        debug!(path = %path.display(), "opening journal");
        let store = SqliteStore::open(&path)?;
        Ok(JournalGuard::open(store, self.guard_config()?)?)
    }

    /// Open the journal and unlock it if it is protected.
    pub fn unlocked_guard(&self, ui: &UiContext) -> anyhow::Result<JournalGuard<SqliteStore>> {
        let mut guard = self.open_guard()?;
        unlock_with_retry(self, ui, &mut guard)?;
        Ok(guard)
    }
}
