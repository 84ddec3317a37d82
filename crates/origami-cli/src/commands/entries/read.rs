use origami_core::storage::date_key;

use crate::app::AppContext;
use crate::cli::ReadArgs;
use crate::errors::CliError;
use crate::helpers::parse_date;
use crate::ui::{
    blank_line, divider, format_datetime, format_mood, header, kv, print, print_json, wrap,
    OutputMode,
};

pub fn handle_read(ctx: &AppContext, args: &ReadArgs) -> anyhow::Result<()> {
    let date = parse_date(&args.date)?;
    let ui = ctx.ui_context(args.json);
    let mut guard = ctx.unlocked_guard(&ui)?;

    let entry = guard.read_entry(date)?.ok_or_else(|| {
        CliError::not_found(
            format!("No entry for {}", date_key(date)),
            "Hint: Run `origami list` to see which days have entries.",
        )
    })?;

    match ui.mode {
        OutputMode::Json => print_json(&entry)?,
        OutputMode::Pretty => {
            if !ctx.quiet() {
                print(&ui, &header(&ui, "read", Some(&date_key(date))));
                blank_line(&ui);
                print(&ui, &kv(&ui, "Mood", &format_mood(entry.mood)));
                print(
                    &ui,
                    &kv(&ui, "Created", &format_datetime(&entry.created_at, true)),
                );
                print(
                    &ui,
                    &kv(&ui, "Updated", &format_datetime(&entry.updated_at, true)),
                );
                blank_line(&ui);
                print(&ui, &divider(&ui));
                blank_line(&ui);
            }
            for line in wrap(&entry.body, ui.width.min(100)) {
                println!("{}", line);
            }
        }
        OutputMode::Plain => {
            if !ctx.quiet() {
                println!("date={}", date_key(entry.date));
                if let Some(mood) = entry.mood {
                    println!("mood={}", mood);
                }
                println!("created_at={}", format_datetime(&entry.created_at, false));
                println!("updated_at={}", format_datetime(&entry.updated_at, false));
            }
            println!("{}", entry.body);
        }
    }

    Ok(())
}
