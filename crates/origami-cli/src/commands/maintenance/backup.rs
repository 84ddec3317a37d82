use std::path::Path;

use crate::app::AppContext;
use crate::cli::BackupArgs;
use crate::errors::CliError;
use crate::ui::theme::{styled, styles, DOT};
use crate::ui::{badge, blank_line, format_bytes, hint, print, Badge, OutputMode, Spinner};

/// Copy the database as-is. Sealed bodies stay sealed; no password needed.
pub fn handle_backup(ctx: &AppContext, args: &BackupArgs) -> anyhow::Result<()> {
    let destination = Path::new(&args.destination);
    if destination.exists() {
        return Err(CliError::invalid_input(format!(
            "Backup destination already exists: {}",
            destination.display()
        ))
        .into());
    }

    let guard = ctx.open_guard()?;
    let ui = ctx.ui_context(false);

    if ctx.interactive() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Back up journal to {}?", args.destination))
            .default(true)
            .interact()?;
        if !proceed {
            print(&ui, &badge(&ui, Badge::Warn, "Backup cancelled"));
            return Ok(());
        }
    }

    let spinner = Spinner::new(&ui, "Backing up");
    spinner.start();
    if let Err(err) = guard.store().backup_to(destination) {
        spinner.finish_err("Backup failed");
        return Err(err.into());
    }
    spinner.clear();

    let bytes = std::fs::metadata(destination).map(|m| m.len()).unwrap_or(0);
    if ctx.quiet() {
        return Ok(());
    }
    match ui.mode {
        OutputMode::Pretty => {
            print(&ui, &badge(&ui, Badge::Ok, "Backup complete"));
            let context = format!(
                "Path: {}  {}  Size: {}",
                args.destination,
                DOT.get(ui.unicode),
                format_bytes(bytes)
            );
            println!("{}", styled(&context, styles::dim(), ui.color));
            blank_line(&ui);
            print(&ui, &hint(&ui, "origami check"));
        }
        OutputMode::Plain | OutputMode::Json => {
            println!("status=ok");
            println!("destination={}", args.destination);
            println!("bytes={}", bytes);
        }
    }
    Ok(())
}
