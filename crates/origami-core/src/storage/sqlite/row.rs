//! Row types for database queries.

use chrono::{DateTime, NaiveDate, Utc};

use crate::crypto::{CipherScheme, KdfParams, SealedBody};
use crate::error::{JournalError, Result};
use crate::storage::types::{EntrySummary, JournalEntry, PasswordRecord, DATE_FORMAT};

/// Raw row data from the journal_entries table, before parsing into domain types.
#[derive(Debug)]
pub struct EntryRow {
    pub date: String,
    pub scheme: String,
    pub body: Vec<u8>,
    pub nonce: Option<Vec<u8>>,
    pub mood: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl EntryRow {
    pub const COLUMNS: &'static str = "date, scheme, body, nonce, mood, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            scheme: row.get(1)?,
            body: row.get(2)?,
            nonce: row.get(3)?,
            mood: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Metadata columns only; the body is never selected for listings.
#[derive(Debug)]
pub struct SummaryRow {
    pub date: String,
    pub scheme: String,
    pub mood: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl SummaryRow {
    pub const COLUMNS: &'static str = "date, scheme, mood, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            scheme: row.get(1)?,
            mood: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Raw row data from the single-row password_record table.
#[derive(Debug)]
pub struct RecordRow {
    pub salt: Vec<u8>,
    pub verifier: Vec<u8>,
    pub memory_kib: i64,
    pub iterations: i64,
    pub parallelism: i64,
    pub created_at: String,
}

impl RecordRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            salt: row.get(0)?,
            verifier: row.get(1)?,
            memory_kib: row.get(2)?,
            iterations: row.get(3)?,
            parallelism: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| JournalError::Store(format!("Invalid entry date '{}': {}", value, e)))
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| JournalError::Store(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

fn parse_scheme(value: &str) -> Result<CipherScheme> {
    CipherScheme::parse(value)
        .ok_or_else(|| JournalError::Store(format!("Unknown cipher scheme '{}'", value)))
}

fn parse_mood(value: Option<i64>) -> Result<Option<u8>> {
    value
        .map(|m| {
            u8::try_from(m).map_err(|_| JournalError::Store(format!("Invalid mood value {}", m)))
        })
        .transpose()
}

fn parse_cost(value: i64, name: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| JournalError::Store(format!("Invalid {} value {}", name, value)))
}

impl TryFrom<EntryRow> for JournalEntry {
    type Error = JournalError;

    fn try_from(row: EntryRow) -> Result<Self> {
        Ok(JournalEntry {
            date: parse_date(&row.date)?,
            body: SealedBody {
                scheme: parse_scheme(&row.scheme)?,
                ciphertext: row.body,
                nonce: row.nonce,
            },
            mood: parse_mood(row.mood)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<SummaryRow> for EntrySummary {
    type Error = JournalError;

    fn try_from(row: SummaryRow) -> Result<Self> {
        Ok(EntrySummary {
            date: parse_date(&row.date)?,
            scheme: parse_scheme(&row.scheme)?,
            mood: parse_mood(row.mood)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<RecordRow> for PasswordRecord {
    type Error = JournalError;

    fn try_from(row: RecordRow) -> Result<Self> {
        let kdf = KdfParams::new(
            parse_cost(row.memory_kib, "memory_kib")?,
            parse_cost(row.iterations, "iterations")?,
            parse_cost(row.parallelism, "parallelism")?,
        );

        Ok(PasswordRecord {
            salt: row.salt,
            verifier: row.verifier,
            kdf,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_row() -> EntryRow {
        EntryRow {
            date: "2025-01-01".to_string(),
            scheme: "plain".to_string(),
            body: b"hello".to_vec(),
            nonce: None,
            mood: Some(4),
            created_at: "2025-01-01T08:00:00Z".to_string(),
            updated_at: "2025-01-01T09:30:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_entry_row_parses() {
        let entry: JournalEntry = entry_row().try_into().unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(entry.body.scheme, CipherScheme::PassThrough);
        assert_eq!(entry.body.ciphertext, b"hello");
        assert_eq!(entry.mood, Some(4));
        assert!(entry.updated_at > entry.created_at);
    }

    #[test]
    fn test_unknown_scheme_is_store_error() {
        let mut row = entry_row();
        row.scheme = "rot13".to_string();

        let result: Result<JournalEntry> = row.try_into();
        assert!(matches!(result, Err(JournalError::Store(_))));
    }

    #[test]
    fn test_bad_date_is_store_error() {
        let mut row = entry_row();
        row.date = "01/01/2025".to_string();

        let result: Result<JournalEntry> = row.try_into();
        assert!(matches!(result, Err(JournalError::Store(_))));
    }

    #[test]
    fn test_negative_cost_is_store_error() {
        let row = RecordRow {
            salt: vec![0u8; 16],
            verifier: vec![0u8; 32],
            memory_kib: -1,
            iterations: 1,
            parallelism: 1,
            created_at: "2025-01-01T08:00:00Z".to_string(),
        };

        let result: Result<PasswordRecord> = row.try_into();
        assert!(matches!(result, Err(JournalError::Store(_))));
    }
}
