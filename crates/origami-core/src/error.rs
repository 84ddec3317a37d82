//! Error types for Origami core operations.
//!
//! This module defines the error hierarchy for the journal guard. The first
//! four variants are the outcomes the UI layer is expected to render; the
//! rest cover configuration mistakes and internal primitive failures.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for Origami operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Core error type for journal guard operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Password did not match the stored verifier
    #[error("Incorrect password")]
    InvalidCredential,

    /// Entry bodies were accessed while the journal is locked
    #[error("Journal is locked")]
    AccessDenied,

    /// Authentication tag did not verify (corruption or key mismatch)
    #[error("Entry failed integrity check (tampered or wrong key)")]
    TamperedOrWrongKey,

    /// Opaque failure from the store collaborator
    #[error("Storage error: {0}")]
    Store(String),

    /// Too many failed unlock attempts
    #[error("Too many failed attempts; retry in {} seconds", .retry_after.as_secs().max(1))]
    LockedOut { retry_after: Duration },

    /// Operation requires journal protection to be enabled
    #[error("Journal protection is not enabled")]
    NotProtected,

    /// Protection is already enabled
    #[error("Journal protection is already enabled")]
    AlreadyProtected,

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cryptographic primitive failure (RNG, KDF parameters, cipher setup)
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl JournalError {
    /// Whether the caller can recover by prompting the user again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            JournalError::InvalidCredential
                | JournalError::AccessDenied
                | JournalError::LockedOut { .. }
                | JournalError::InvalidInput(_)
        )
    }
}

impl From<rusqlite::Error> for JournalError {
    fn from(err: rusqlite::Error) -> Self {
        JournalError::Store(err.to_string())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Store(err.to_string())
    }
}
