//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI. Journal errors that
//! reach `main` are promoted to a `CliError` so they carry a hint and the
//! right exit code.

use std::fmt;

use origami_core::JournalError;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, journal, entry)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Stored data failed authentication or an integrity check
    IntegrityFailed { message: String, hint: String },

    /// Journal is locked and no password was supplied
    AccessDenied { message: String, hint: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint }
            | CliError::IntegrityFailed { message, hint }
            | CliError::AccessDenied { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create an IntegrityFailed error with message and hint.
    pub fn integrity_failed(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::IntegrityFailed {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Map a journal error to its CLI form.
    ///
    /// Returns `None` for store and crypto failures, which exit with the
    /// generic code.
    pub fn from_journal(err: &JournalError) -> Option<Self> {
        let mapped = match err {
            JournalError::InvalidCredential => CliError::auth_failed("Incorrect password."),
            JournalError::LockedOut { .. } => CliError::auth_failed_with_hint(
                err.to_string(),
                "Hint: Unlock attempts are paused; wait and try again.",
            ),
            JournalError::AccessDenied => CliError::AccessDenied {
                message: "Journal is locked.".to_string(),
                hint: "Hint: Set ORIGAMI_PASSWORD or run the command in a terminal to unlock."
                    .to_string(),
            },
            JournalError::TamperedOrWrongKey => CliError::integrity_failed(
                "Entry failed integrity check (tampered or wrong key).",
                "Hint: Run `origami check` and restore from a backup if problems are reported.",
            ),
            JournalError::NotProtected => CliError::invalid_input(
                "Journal protection is not enabled. Run `origami protect` first.",
            ),
            JournalError::AlreadyProtected => CliError::invalid_input(
                "Journal protection is already enabled. Use `origami passwd` to change the password.",
            ),
            JournalError::InvalidInput(message) => CliError::invalid_input(message.clone()),
            JournalError::Store(_) | JournalError::Crypto(_) => return None,
        };
        Some(mapped)
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed { .. } => exit_codes::INTEGRITY_FAILED,
            CliError::AccessDenied { .. } => exit_codes::ACCESS_DENIED,
        }
    }
}

/// Replace a bare `JournalError` inside `err` with its `CliError` form.
pub fn promote(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<JournalError>() {
        Ok(journal_err) => match CliError::from_journal(&journal_err) {
            Some(cli_err) => cli_err.into(),
            None => journal_err.into(),
        },
        Err(other) => other,
    }
}

/// Split a rendered error into its message and trailing "Hint: ..." line.
pub fn split_hint(message: &str) -> (&str, Option<&str>) {
    match message.find("\nHint:") {
        Some(idx) => (&message[..idx], Some(message[idx + 1..].trim_start_matches("Hint:").trim())),
        None => (message, None),
    }
}

/// Exit code for an error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;
    use std::time::Duration;

    #[test]
    fn test_auth_errors_share_exit_code() {
        let wrong = CliError::from_journal(&JournalError::InvalidCredential).unwrap();
        let locked_out = CliError::from_journal(&JournalError::LockedOut {
            retry_after: Duration::from_secs(30),
        })
        .unwrap();

        assert_eq!(wrong.exit_code(), exit_codes::AUTH_FAILED);
        assert_eq!(locked_out.exit_code(), exit_codes::AUTH_FAILED);
        assert!(locked_out.to_string().contains("30 seconds"));
    }

    #[test]
    fn test_tamper_maps_to_integrity_failure() {
        let err = CliError::from_journal(&JournalError::TamperedOrWrongKey).unwrap();
        assert_eq!(err.exit_code(), exit_codes::INTEGRITY_FAILED);
        assert!(err.to_string().contains("\nHint:"));
    }

    #[test]
    fn test_access_denied_exit_code() {
        let err = CliError::from_journal(&JournalError::AccessDenied).unwrap();
        assert_eq!(err.exit_code(), exit_codes::ACCESS_DENIED);
    }

    #[test]
    fn test_store_errors_stay_generic() {
        assert!(CliError::from_journal(&JournalError::Store("disk".to_string())).is_none());

        let promoted = promote(JournalError::Store("disk".to_string()).into());
        assert_eq!(exit_code_for(&promoted), 1);
    }

    #[test]
    fn test_promote_journal_error() {
        let promoted = promote(JournalError::NotProtected.into());
        assert_eq!(exit_code_for(&promoted), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_split_hint() {
        let err = CliError::not_found("No entry for 2025-01-01", "Hint: Run `origami list`.");
        let rendered = err.to_string();
        let (message, hint) = split_hint(&rendered);
        assert_eq!(message, "No entry for 2025-01-01");
        assert_eq!(hint, Some("Run `origami list`."));

        assert_eq!(split_hint("plain failure"), ("plain failure", None));
    }

    #[test]
    fn test_promote_leaves_other_errors() {
        let promoted = promote(anyhow::anyhow!("boom"));
        assert_eq!(promoted.to_string(), "boom");
        assert_eq!(exit_code_for(&promoted), 1);
    }
}
