use origami_core::storage::date_key;

use crate::app::AppContext;
use crate::cli::WriteArgs;
use crate::helpers::{parse_date, read_entry_body};
use crate::ui::{format_mood, print, receipt};

pub fn handle_write(ctx: &AppContext, args: &WriteArgs) -> anyhow::Result<()> {
    let date = parse_date(&args.date)?;
    let body = read_entry_body(ctx.cli().no_input, args.body.clone())?;

    let ui = ctx.ui_context(false);
    let mut guard = ctx.unlocked_guard(&ui)?;
    match args.mood {
        Some(mood) => guard.write_entry_with_mood(date, &body, mood)?,
        None => guard.write_entry(date, &body)?,
    }

    if ctx.quiet() {
        return Ok(());
    }
    let date_display = date_key(date);
    let protection = if guard.is_protected()? {
        "sealed"
    } else {
        "unencrypted"
    };
    let mood = format_mood(args.mood);
    let mut items = vec![("Date", date_display.as_str()), ("Stored", protection)];
    if args.mood.is_some() {
        items.push(("Mood", mood.as_str()));
    }
    print(&ui, &receipt(&ui, "Entry saved", &items));
    Ok(())
}
