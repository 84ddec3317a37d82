use std::path::PathBuf;

use origami_core::SqliteStore;
use tracing::info;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_journal_path, write_config, OrigamiConfig};
use crate::errors::CliError;
use crate::ui::{blank_line, hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = match args.config_path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => resolve_config_path()?,
    };
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ))
        .into());
    }

    let journal_path = match args.path.as_deref().or(ctx.cli().db.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_journal_path()?,
    };
    let existed = journal_path.exists();

    // opening creates the file and schema
    let store = SqliteStore::open(&journal_path)?;
    drop(store);

    write_config(&config_path, &OrigamiConfig::new(journal_path.clone()))?;
    info!(journal = %journal_path.display(), "initialized journal");

    if ctx.quiet() {
        return Ok(());
    }

    let ui = ctx.ui_context(false);
    let journal_display = journal_path.display().to_string();
    let config_display = config_path.display().to_string();
    let title = if existed {
        "Using existing journal"
    } else {
        "Journal created"
    };
    print(
        &ui,
        &receipt(
            &ui,
            title,
            &[
                ("Journal", journal_display.as_str()),
                ("Config", config_display.as_str()),
            ],
        ),
    );
    blank_line(&ui);
    print(
        &ui,
        &hint(&ui, "Run `origami protect` to require a password."),
    );
    Ok(())
}
