//! Interactive session.
//!
//! One guard lives for the whole session, so the journal stays unlocked
//! between commands until `lock`, the idle timeout, or the end of input.
//! Failed unlocks are saved with the journal, so a lockout reached here also
//! holds for later one-shot commands.

use std::io::{self, BufRead, IsTerminal, Write};

use chrono::NaiveDate;
use origami_core::storage::date_key;
use origami_core::{GateState, JournalGuard, JournalStore};
use tracing::debug;

use crate::app::{unlock_with_retry, AppContext};
use crate::errors::{promote, split_hint};
use crate::helpers::parse_date;
use crate::ui::{
    badge, format_mood, header, hint, kv, print, print_error, simple_table, Badge, Column,
    UiContext,
};

const HELP: &str = "Commands: read DATE, write DATE TEXT, list, lock, unlock, status, help, quit";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Read(NaiveDate),
    Write(NaiveDate, String),
    List,
    Lock,
    Unlock,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Verb for logging; never includes entry text.
    fn name(&self) -> &'static str {
        match self {
            ShellCommand::Read(_) => "read",
            ShellCommand::Write(..) => "write",
            ShellCommand::List => "list",
            ShellCommand::Lock => "lock",
            ShellCommand::Unlock => "unlock",
            ShellCommand::Status => "status",
            ShellCommand::Help => "help",
            ShellCommand::Quit => "quit",
        }
    }
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let date = |value: &str| -> Result<NaiveDate, String> {
        if value.is_empty() {
            return Err(format!("Usage: {} DATE", verb));
        }
        parse_date(value).map_err(|err| err.to_string())
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "read" => ShellCommand::Read(date(rest)?),
        "write" => {
            let (day, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: write DATE TEXT".to_string())?;
            let text = text.trim();
            if text.is_empty() {
                return Err("Usage: write DATE TEXT".to_string());
            }
            ShellCommand::Write(date(day)?, text.to_string())
        }
        "list" | "ls" => ShellCommand::List,
        "lock" => ShellCommand::Lock,
        "unlock" => ShellCommand::Unlock,
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {} (type `help`)", other)),
    };
    Ok(Some(command))
}

pub fn handle_shell(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let mut guard = ctx.open_guard()?;

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    if !ctx.quiet() {
        print(&ui, &header(&ui, "shell", Some(guard.state().as_str())));
        print(&ui, &hint(&ui, HELP));
    }

    let mut line = String::new();
    loop {
        if prompt {
            eprint!("origami> ");
            io::stderr().flush()?;
        }
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_shell_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                print_error(&ui, &message, None);
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }

        debug!(command = command.name(), "shell command");
        if let Err(err) = run_command(ctx, &ui, &mut guard, command) {
            let rendered = promote(err).to_string();
            let (message, error_hint) = split_hint(&rendered);
            print_error(&ui, message, error_hint);
        }
    }

    guard.lock();
    Ok(())
}

fn run_command<S: JournalStore>(
    ctx: &AppContext,
    ui: &UiContext,
    guard: &mut JournalGuard<S>,
    command: ShellCommand,
) -> anyhow::Result<()> {
    match command {
        ShellCommand::Read(date) => {
            if !require_unlocked(ui, guard) {
                return Ok(());
            }
            match guard.read_entry(date)? {
                Some(entry) => {
                    print(ui, &kv(ui, "Date", &date_key(entry.date)));
                    print(ui, &kv(ui, "Mood", &format_mood(entry.mood)));
                    println!("{}", entry.body);
                }
                None => print(
                    ui,
                    &badge(ui, Badge::Info, &format!("No entry for {}", date_key(date))),
                ),
            }
        }
        ShellCommand::Write(date, text) => {
            if !require_unlocked(ui, guard) {
                return Ok(());
            }
            guard.write_entry(date, &text)?;
            print(
                ui,
                &badge(ui, Badge::Ok, &format!("Saved {}", date_key(date))),
            );
        }
        ShellCommand::List => {
            let summaries = guard.list_entries()?;
            if summaries.is_empty() {
                print(ui, &badge(ui, Badge::Info, "No entries yet"));
                return Ok(());
            }
            let rows: Vec<Vec<String>> = summaries
                .iter()
                .map(|summary| vec![date_key(summary.date), format_mood(summary.mood)])
                .collect();
            let columns = [Column::new("Date"), Column::new("Mood")];
            print(ui, &simple_table(ui, &columns, &rows));
        }
        ShellCommand::Lock => {
            if !guard.is_protected()? {
                print(ui, &badge(ui, Badge::Info, "Journal is not password protected"));
            } else {
                guard.lock();
                print(ui, &badge(ui, Badge::Ok, "Locked"));
            }
        }
        ShellCommand::Unlock => {
            if !guard.is_protected()? {
                print(ui, &badge(ui, Badge::Info, "Journal is not password protected"));
            } else if guard.state() == GateState::Unlocked {
                print(ui, &badge(ui, Badge::Info, "Already unlocked"));
            } else {
                unlock_with_retry(ctx, ui, guard)?;
                print(ui, &badge(ui, Badge::Ok, "Unlocked"));
            }
        }
        ShellCommand::Status => {
            let protected = guard.is_protected()?;
            print(ui, &kv(ui, "Protection", if protected { "on" } else { "off" }));
            print(ui, &kv(ui, "State", guard.state().as_str()));
            print(ui, &kv(ui, "Entries", &guard.list_entries()?.len().to_string()));
            if protected {
                print(
                    ui,
                    &kv(ui, "Failed attempts", &guard.failed_attempts().to_string()),
                );
            }
        }
        ShellCommand::Help => print(ui, &hint(ui, HELP)),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Warn and return false when the gate is closed, including after an idle
/// timeout.
fn require_unlocked<S: JournalStore>(ui: &UiContext, guard: &mut JournalGuard<S>) -> bool {
    if guard.state() == GateState::Unlocked {
        return true;
    }
    print(
        ui,
        &badge(ui, Badge::Warn, "Journal is locked; type `unlock` first"),
    );
    false
}
