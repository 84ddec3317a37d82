use origami_core::storage::date_key;

use crate::app::AppContext;
use crate::cli::SearchArgs;
use crate::ui::{
    badge, format_mood, header, preview, print, print_json, simple_table, Badge, Column,
};

const PREVIEW_WIDTH: usize = 60;

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let mut guard = ctx.unlocked_guard(&ui)?;
    let matches = guard.search_entries(&args.query)?;

    if ui.mode.is_json() {
        return print_json(&matches);
    }

    if matches.is_empty() {
        if !ctx.quiet() {
            print(
                &ui,
                &badge(&ui, Badge::Info, &format!("No entries match \"{}\"", args.query)),
            );
        }
        return Ok(());
    }

    if !ctx.quiet() && ui.mode.is_pretty() {
        print(&ui, &header(&ui, "search", Some(&args.query)));
    }

    let pretty = ui.mode.is_pretty();
    let rows: Vec<Vec<String>> = matches
        .iter()
        .map(|entry| {
            let mut row = vec![date_key(entry.date)];
            if pretty {
                row.push(format_mood(entry.mood));
            }
            row.push(preview(&entry.body, PREVIEW_WIDTH));
            row
        })
        .collect();
    let columns = [
        Column::new("Date"),
        Column::new("Mood"),
        Column::new("Preview"),
    ];
    print(&ui, &simple_table(&ui, &columns, &rows));
    Ok(())
}
