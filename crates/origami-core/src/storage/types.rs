//! Core data types for the storage layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::crypto::{CipherScheme, KdfParams, SealedBody};

/// Format used for entry dates, both as storage key and as AEAD associated data.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a date the way it is keyed in storage (`YYYY-MM-DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A journal entry as stored. The body is opaque outside the entry cipher.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Calendar day this entry belongs to (one entry per day)
    pub date: NaiveDate,

    /// Stored body with its scheme tag and nonce
    pub body: SealedBody,

    /// Optional mood rating (1..=5)
    pub mood: Option<u8>,

    /// When this entry was first written
    pub created_at: DateTime<Utc>,

    /// When the body or mood last changed
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Same entry with a different stored body; timestamps are kept.
    pub fn with_body(&self, body: SealedBody) -> Self {
        Self {
            date: self.date,
            body,
            mood: self.mood,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Salted verifier for the journal password. At most one per installation.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    /// Random per-installation salt
    pub salt: Vec<u8>,

    /// Verification hash derived from password + salt
    pub verifier: Vec<u8>,

    /// KDF cost parameters this record was created with
    pub kdf: KdfParams,

    /// When protection was enabled or the password last changed
    pub created_at: DateTime<Utc>,
}

impl PasswordRecord {
    pub fn new(salt: Vec<u8>, verifier: Vec<u8>, kdf: KdfParams) -> Self {
        Self {
            salt,
            verifier,
            kdf,
            created_at: Utc::now(),
        }
    }

    /// Whether two records verify the same password.
    pub fn same_secret(&self, other: &PasswordRecord) -> bool {
        self.salt == other.salt && self.verifier == other.verifier && self.kdf == other.kdf
    }
}

impl std::fmt::Debug for PasswordRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordRecord")
            .field("salt_len", &self.salt.len())
            .field("verifier", &"[REDACTED]")
            .field("kdf", &self.kdf)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Failed-unlock bookkeeping that outlives a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutState {
    /// Consecutive wrong passwords since the last success
    pub failed_attempts: u32,

    /// End of the active lockout, if one was triggered
    pub locked_until: Option<DateTime<Utc>>,
}

/// Metadata-only view of an entry. Never carries a body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub date: NaiveDate,
    pub scheme: CipherScheme,
    pub mood: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JournalEntry> for EntrySummary {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            date: entry.date,
            scheme: entry.body.scheme,
            mood: entry.mood,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// An entry with its body opened for the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecryptedEntry {
    pub date: NaiveDate,
    pub body: String,
    pub mood: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(date_key(date), "2025-01-01");
    }

    #[test]
    fn test_password_record_debug_redacts_verifier() {
        let record = PasswordRecord::new(vec![7u8; 16], vec![0xAB; 32], KdfParams::default());
        let debug_output = format!("{:?}", record);

        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("171"));
    }

    #[test]
    fn test_same_secret_ignores_timestamp() {
        let a = PasswordRecord::new(vec![1u8; 16], vec![2u8; 32], KdfParams::default());
        let mut b = a.clone();
        b.created_at = a.created_at + chrono::Duration::days(1);
        assert!(a.same_secret(&b));

        b.salt = vec![3u8; 16];
        assert!(!a.same_secret(&b));
    }
}
