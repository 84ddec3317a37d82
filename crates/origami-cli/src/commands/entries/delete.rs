use origami_core::storage::date_key;

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::ui::{badge, print, receipt, Badge};

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let date = parse_date(&args.date)?;
    let ui = ctx.ui_context(false);
    let mut guard = ctx.unlocked_guard(&ui)?;
    let date_display = date_key(date);

    if ctx.interactive() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete the entry for {}?", date_display))
            .default(false)
            .interact()?;
        if !proceed {
            print(&ui, &badge(&ui, Badge::Warn, "Cancelled"));
            return Ok(());
        }
    }

    if !guard.delete_entry(date)? {
        return Err(CliError::not_found(
            format!("No entry for {}", date_display),
            "Hint: Run `origami list` to see which days have entries.",
        )
        .into());
    }

    if !ctx.quiet() {
        print(
            &ui,
            &receipt(&ui, "Entry deleted", &[("Date", date_display.as_str())]),
        );
    }
    Ok(())
}
