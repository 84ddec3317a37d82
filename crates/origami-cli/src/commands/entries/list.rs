use origami_core::storage::date_key;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::ui::{
    badge, format_datetime, format_mood, header, hint, print, print_json, simple_table, Badge,
    Column,
};

/// List entry metadata. Works on a locked journal; no body is opened.
pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let guard = ctx.open_guard()?;
    let summaries = guard.list_entries()?;

    let ui = ctx.ui_context(args.json);
    if ui.mode.is_json() {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        if !ctx.quiet() {
            print(&ui, &badge(&ui, Badge::Info, "No entries yet"));
            print(&ui, &hint(&ui, "origami write today"));
        }
        return Ok(());
    }

    if !ctx.quiet() && ui.mode.is_pretty() {
        let count = format!(
            "{} entr{}",
            summaries.len(),
            if summaries.len() == 1 { "y" } else { "ies" }
        );
        print(&ui, &header(&ui, "list", Some(&count)));
    }

    let pretty = ui.mode.is_pretty();
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|summary| {
            vec![
                date_key(summary.date),
                format_mood(summary.mood),
                summary.scheme.as_str().to_string(),
                format_datetime(&summary.updated_at, pretty),
            ]
        })
        .collect();
    let columns = [
        Column::new("Date"),
        Column::new("Mood"),
        Column::new("Scheme"),
        Column::new("Updated"),
    ];
    print(&ui, &simple_table(&ui, &columns, &rows));
    Ok(())
}
