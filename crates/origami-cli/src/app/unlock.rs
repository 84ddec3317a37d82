//! Password unlock with retry logic.

use std::thread;
use std::time::Duration;

use origami_core::{GateState, JournalError, JournalGuard, JournalStore};
use tracing::debug;

use crate::constants::{env_vars, MAX_PROMPT_ATTEMPTS};
use crate::errors::CliError;
use crate::helpers::{env_password, prompt_password};
use crate::ui::{Spinner, UiContext};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Unlock `guard` if it is locked.
///
/// `ORIGAMI_PASSWORD` gets exactly one attempt. Interactive sessions are
/// prompted up to three times, fewer if the guard's lockout is closer.
pub fn unlock_with_retry<S: JournalStore>(
    ctx: &super::AppContext<'_>,
    ui: &UiContext,
    guard: &mut JournalGuard<S>,
) -> anyhow::Result<()> {
    if guard.state() == GateState::Unlocked {
        return Ok(());
    }

    if let Some(password) = env_password(env_vars::PASSWORD) {
        return Ok(unlock_in_background(ui, guard, &password)?);
    }

    if !ctx.interactive() {
        return Err(JournalError::AccessDenied.into());
    }

    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let password = prompt_password("Password")?;
        match unlock_in_background(ui, guard, &password) {
            Ok(()) => return Ok(()),
            Err(JournalError::InvalidCredential) => {
                let mut remaining = MAX_PROMPT_ATTEMPTS.saturating_sub(attempts);
                if let Some(left) = guard.remaining_attempts() {
                    remaining = remaining.min(left);
                }
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed password attempts.",
                        "Hint: If you forgot your password, the journal cannot be recovered.\n      Backups use the same password.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Verify `password` on the guard's worker thread while a spinner runs.
pub fn unlock_in_background<S: JournalStore>(
    ui: &UiContext,
    guard: &mut JournalGuard<S>,
    password: &str,
) -> origami_core::Result<()> {
    let pending = guard.begin_unlock(password)?;
    let spinner = Spinner::new(ui, "Unlocking journal");
    spinner.start();

    let outcome = loop {
        if let Some(outcome) = pending.try_result() {
            break outcome;
        }
        thread::sleep(POLL_INTERVAL);
    };
    spinner.clear();
    debug!(
        elapsed_ms = pending.elapsed().as_millis() as u64,
        success = outcome.is_success(),
        "password check finished"
    );

    guard.finish_unlock(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use origami_core::crypto::KdfParams;
    use origami_core::{GuardConfig, SqliteStore};

    use crate::ui::OutputMode;

    fn plain_ui() -> UiContext {
        UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        }
    }

    fn protected_guard() -> JournalGuard<SqliteStore> {
        let config = GuardConfig::default().with_kdf(KdfParams::new(8 * 1024, 1, 1));
        let store = SqliteStore::open_in_memory().unwrap();
        let mut guard = JournalGuard::open(store, config).unwrap();
        guard.enable_protection("orange17").unwrap();
        guard.lock();
        guard
    }

    #[test]
    fn test_unlock_in_background_opens_gate() {
        let mut guard = protected_guard();
        unlock_in_background(&plain_ui(), &mut guard, "orange17").unwrap();
        assert_eq!(guard.state(), GateState::Unlocked);
    }

    #[test]
    fn test_unlock_in_background_wrong_password() {
        let mut guard = protected_guard();
        let err = unlock_in_background(&plain_ui(), &mut guard, "wrong").unwrap_err();
        assert!(matches!(err, JournalError::InvalidCredential));
        assert_eq!(guard.state(), GateState::Locked);
        assert_eq!(guard.failed_attempts(), 1);
    }
}
