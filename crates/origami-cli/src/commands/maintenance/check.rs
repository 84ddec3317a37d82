use serde::Serialize;

use origami_core::storage::date_key;
use origami_core::JournalError;

use crate::app::{unlock_with_retry, AppContext};
use crate::cli::CheckArgs;
use crate::constants::env_vars;
use crate::errors::CliError;
use crate::helpers::env_password;
use crate::ui::{badge, blank_line, print, print_json, Badge, StepList};

#[derive(Debug, Serialize)]
struct CheckReport {
    ok: bool,
    entries_checked: usize,
    /// `None` when bodies were not opened (locked, no password available)
    bodies_verified: Option<usize>,
    problems: Vec<String>,
}

/// Check the store, then try to open every entry body when a password is at
/// hand. Bodies are never printed.
pub fn handle_check(ctx: &AppContext, args: &CheckArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let mut guard = ctx.open_guard()?;

    let store_report = guard.store().check_integrity()?;
    let mut problems = store_report.problems.clone();

    let mut steps = StepList::new(&ui, &["Store", "Entry bodies"]);
    if !ctx.quiet() {
        steps.start("Integrity check");
    }
    if store_report.is_ok() {
        steps.ok();
    } else {
        steps.err();
    }

    let can_unlock = !guard.is_protected()?
        || env_password(env_vars::PASSWORD).is_some()
        || ctx.interactive();
    let bodies_verified = if can_unlock {
        unlock_with_retry(ctx, &ui, &mut guard)?;
        let mut verified = 0;
        for summary in guard.list_entries()? {
            match guard.read_entry(summary.date) {
                Ok(_) => verified += 1,
                Err(JournalError::TamperedOrWrongKey) => problems.push(format!(
                    "Entry {}: body failed authentication",
                    date_key(summary.date)
                )),
                Err(err) => return Err(err.into()),
            }
        }
        if verified == store_report.entries_checked {
            steps.ok();
        } else {
            steps.err();
        }
        Some(verified)
    } else {
        steps.skip();
        None
    };

    let report = CheckReport {
        ok: problems.is_empty() && !steps.has_error(),
        entries_checked: store_report.entries_checked,
        bodies_verified,
        problems,
    };

    if ui.mode.is_json() {
        print_json(&report)?;
    } else {
        for problem in &report.problems {
            eprintln!("problem={}", problem);
        }
        if !ctx.quiet() && report.ok {
            blank_line(&ui);
            let message = match report.bodies_verified {
                Some(_) => "All checks passed".to_string(),
                None => "Store checks passed (set ORIGAMI_PASSWORD to verify bodies)".to_string(),
            };
            print(&ui, &badge(&ui, Badge::Ok, &message));
        }
    }

    if !report.ok {
        return Err(CliError::integrity_failed(
            format!("Integrity check failed ({} problems)", report.problems.len()),
            "Hint: Restore from a backup made with `origami backup`.",
        )
        .into());
    }
    Ok(())
}
