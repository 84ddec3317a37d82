//! Enable, disable, and change journal password protection.

use origami_core::crypto::{PasswordStrength, StrengthLabel};
use origami_core::JournalError;

use crate::app::AppContext;
use crate::constants::env_vars;
use crate::helpers::{read_new_password, read_password};
use crate::ui::theme::BULLET;
use crate::ui::{badge, hint, print, receipt, Badge, Spinner, UiContext};

pub fn handle_protect(ctx: &AppContext) -> anyhow::Result<()> {
    let mut guard = ctx.open_guard()?;
    if guard.is_protected()? {
        return Err(JournalError::AlreadyProtected.into());
    }

    let password = read_new_password(env_vars::PASSWORD, ctx.interactive())?;
    let strength = PasswordStrength::evaluate(&password);

    let ui = ctx.ui_context(false);
    let spinner = Spinner::new(&ui, "Sealing entries");
    spinner.start();
    let result = guard.enable_protection(&password);
    spinner.clear();
    result?;

    let sealed = guard.list_entries()?.len().to_string();
    if ctx.quiet() {
        return Ok(());
    }
    print(
        &ui,
        &receipt(
            &ui,
            "Protection enabled",
            &[
                ("Entries sealed", sealed.as_str()),
                ("Strength", strength.label.as_str()),
            ],
        ),
    );
    print_strength_feedback(&ui, &strength);
    print(
        &ui,
        &hint(
            &ui,
            "There is no password recovery. Keep a backup of the password somewhere safe.",
        ),
    );
    Ok(())
}

pub fn handle_unprotect(ctx: &AppContext) -> anyhow::Result<()> {
    let mut guard = ctx.open_guard()?;
    if !guard.is_protected()? {
        return Err(JournalError::NotProtected.into());
    }

    let current = read_password(env_vars::PASSWORD, "Current password", ctx.interactive())?;
    let ui = ctx.ui_context(false);

    if ctx.interactive() && !ctx.quiet() {
        let proceed = dialoguer::Confirm::new()
            .with_prompt("Remove the password? Entries will be stored unencrypted")
            .default(false)
            .interact()?;
        if !proceed {
            print(&ui, &badge(&ui, Badge::Warn, "Cancelled"));
            return Ok(());
        }
    }

    let spinner = Spinner::new(&ui, "Opening entries");
    spinner.start();
    let result = guard.disable_protection(&current);
    spinner.clear();
    result?;

    if ctx.quiet() {
        return Ok(());
    }
    let opened = guard.list_entries()?.len().to_string();
    print(
        &ui,
        &receipt(
            &ui,
            "Protection disabled",
            &[("Entries stored unencrypted", opened.as_str())],
        ),
    );
    Ok(())
}

pub fn handle_passwd(ctx: &AppContext) -> anyhow::Result<()> {
    let mut guard = ctx.open_guard()?;
    if !guard.is_protected()? {
        return Err(JournalError::NotProtected.into());
    }

    let current = read_password(env_vars::PASSWORD, "Current password", ctx.interactive())?;
    let new_password = read_new_password(env_vars::NEW_PASSWORD, ctx.interactive())?;
    let strength = PasswordStrength::evaluate(&new_password);

    let ui = ctx.ui_context(false);
    let spinner = Spinner::new(&ui, "Re-sealing entries");
    spinner.start();
    let result = guard.change_password(&current, &new_password);
    spinner.clear();
    result?;

    if ctx.quiet() {
        return Ok(());
    }
    let resealed = guard.list_entries()?.len().to_string();
    print(
        &ui,
        &receipt(
            &ui,
            "Password changed",
            &[
                ("Entries re-sealed", resealed.as_str()),
                ("Strength", strength.label.as_str()),
            ],
        ),
    );
    print_strength_feedback(&ui, &strength);
    Ok(())
}

fn print_strength_feedback(ui: &UiContext, strength: &PasswordStrength) {
    if matches!(strength.label, StrengthLabel::Good | StrengthLabel::Strong) {
        return;
    }
    for suggestion in &strength.feedback {
        if ui.mode.is_pretty() {
            println!("  {} {}", BULLET.get(ui.unicode), suggestion);
        } else {
            print(ui, &hint(ui, suggestion));
        }
    }
}
