//! SQLite storage backend.
//!
//! Bodies arrive from the guard already sealed (or pass-through when the
//! journal is unprotected). This store persists bytes and metadata as given
//! and never interprets a body.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::debug;

use crate::crypto::{CipherScheme, NONCE_LENGTH};
use crate::error::{JournalError, Result};
use crate::storage::traits::JournalStore;
use crate::storage::types::{date_key, EntrySummary, JournalEntry, LockoutState, PasswordRecord};

use row::{parse_timestamp, EntryRow, RecordRow, SummaryRow};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

const LOCKOUT_FAILED_KEY: &str = "lockout_failed_attempts";
const LOCKOUT_UNTIL_KEY: &str = "lockout_until";

const SCHEMA_V1: &str = r#"
    CREATE TABLE journal_entries (
        date TEXT PRIMARY KEY,
        scheme TEXT NOT NULL,
        body BLOB NOT NULL,
        nonce BLOB,
        mood INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE password_record (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        salt BLOB NOT NULL,
        verifier BLOB NOT NULL,
        memory_kib INTEGER NOT NULL,
        iterations INTEGER NOT NULL,
        parallelism INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

/// Result of [`SqliteStore::check_integrity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub entries_checked: usize,
    pub problems: Vec<String>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// SQLite-backed journal store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the journal database at `path` and run migrations.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::migrate(&mut conn)?;
        debug!(path = %path.display(), "opened journal database");

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Self::migrate(&mut conn)?;

        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Location of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.lock_conn()?;
        Self::read_schema_version(&conn)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| JournalError::Store("SQLite connection poisoned".to_string()))
    }

    fn read_schema_version(conn: &Connection) -> Result<i64> {
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            None => Ok(0),
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| JournalError::Store(format!("Invalid schema version '{}'", v))),
        }
    }

    fn read_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
        Ok(conn
            .query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn migrate(conn: &mut Connection) -> Result<()> {
        // freed pages would otherwise keep old plaintext after re-sealing
        conn.pragma_update(None, "secure_delete", true)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
        )?;

        let version = Self::read_schema_version(conn)?;
        if version > SCHEMA_VERSION {
            return Err(JournalError::Store(format!(
                "Database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        if version < 1 {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_V1)?;
            tx.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
                [SCHEMA_VERSION.to_string()],
            )?;
            tx.commit()?;
            debug!(version = SCHEMA_VERSION, "initialized journal schema");
        }

        Ok(())
    }

    fn timestamp(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn write_entry(conn: &Connection, entry: &JournalEntry) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO journal_entries (date, scheme, body, nonce, mood, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(date) DO UPDATE SET
                scheme = excluded.scheme,
                body = excluded.body,
                nonce = excluded.nonce,
                mood = excluded.mood,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
            params![
                date_key(entry.date),
                entry.body.scheme.as_str(),
                entry.body.ciphertext,
                entry.body.nonce,
                entry.mood.map(i64::from),
                Self::timestamp(&entry.created_at),
                Self::timestamp(&entry.updated_at),
            ],
        )?;
        Ok(())
    }

    fn write_record(conn: &Connection, record: &PasswordRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO password_record
                (id, salt, verifier, memory_kib, iterations, parallelism, created_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.salt,
                record.verifier,
                i64::from(record.kdf.memory_kib),
                i64::from(record.kdf.iterations),
                i64::from(record.kdf.parallelism),
                Self::timestamp(&record.created_at),
            ],
        )?;
        Ok(())
    }

    /// Write a consistent copy of the database to `dest`.
    ///
    /// Sealed bodies stay sealed in the copy. Refuses to overwrite an
    /// existing file.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        if dest.exists() {
            return Err(JournalError::Store(format!(
                "Backup destination already exists: {}",
                dest.display()
            )));
        }

        let temp_path = crate::fs::temp_sibling(dest)?;
        let temp_str = temp_path
            .to_str()
            .ok_or_else(|| JournalError::Store("Backup path is not valid UTF-8".to_string()))?;

        {
            let conn = self.lock_conn()?;
            if let Err(e) = conn.execute("VACUUM INTO ?1", [temp_str]) {
                let _ = fs::remove_file(&temp_path);
                return Err(e.into());
            }
        }

        // a file created at dest since the check above is never replaced
        crate::fs::publish_new(&temp_path, dest).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => JournalError::Store(format!(
                "Backup destination already exists: {}",
                dest.display()
            )),
            _ => JournalError::Store(format!("Backup failed: {}", e)),
        })?;
        debug!(dest = %dest.display(), "wrote journal backup");

        Ok(())
    }

    /// Check SQLite page integrity and the shape of every stored body.
    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        let conn = self.lock_conn()?;
        let mut report = IntegrityReport::default();

        let mut stmt = conn.prepare("PRAGMA integrity_check")?;
        let pages = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for line in pages {
            let line = line?;
            if line != "ok" {
                report.problems.push(format!("SQLite: {}", line));
            }
        }

        let record: Option<RecordRow> = conn
            .query_row(
                "SELECT salt, verifier, memory_kib, iterations, parallelism, created_at FROM password_record WHERE id = 1",
                [],
                RecordRow::from_row,
            )
            .optional()?;
        let protected = record.is_some();
        if let Some(record) = record {
            if record.salt.len() < crate::crypto::key::SALT_LENGTH {
                report.problems.push("Password record: salt too short".to_string());
            }
            if record.verifier.len() != crate::crypto::key::VERIFIER_LENGTH {
                report
                    .problems
                    .push("Password record: verifier has the wrong length".to_string());
            }
        }

        let mut stmt = conn.prepare("SELECT date, scheme, length(nonce) FROM journal_entries ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;

        for row in rows {
            let (date, scheme, nonce_len) = row?;
            report.entries_checked += 1;

            match (CipherScheme::parse(&scheme), nonce_len) {
                (None, _) => report
                    .problems
                    .push(format!("Entry {}: unknown cipher scheme '{}'", date, scheme)),
                (Some(CipherScheme::XChaCha20Poly1305), len) => {
                    if len != Some(NONCE_LENGTH as i64) {
                        report
                            .problems
                            .push(format!("Entry {}: sealed body has a missing or malformed nonce", date));
                    }
                    if !protected {
                        report.problems.push(format!(
                            "Entry {}: sealed body but journal protection is off",
                            date
                        ));
                    }
                }
                (Some(CipherScheme::PassThrough), len) => {
                    if len.is_some() {
                        report
                            .problems
                            .push(format!("Entry {}: plain body carries a nonce", date));
                    }
                    if protected {
                        report.problems.push(format!(
                            "Entry {}: plain body but journal protection is on",
                            date
                        ));
                    }
                }
            }
        }

        Ok(report)
    }
}

impl JournalStore for SqliteStore {
    fn get_entry(&self, date: NaiveDate) -> Result<Option<JournalEntry>> {
        let conn = self.lock_conn()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM journal_entries WHERE date = ?1",
                    EntryRow::COLUMNS
                ),
                [date_key(date)],
                EntryRow::from_row,
            )
            .optional()?;

        row.map(JournalEntry::try_from).transpose()
    }

    fn put_entry(&mut self, entry: &JournalEntry) -> Result<()> {
        let conn = self.lock_conn()?;
        Self::write_entry(&conn, entry)?;
        debug!(date = %entry.date, scheme = entry.body.scheme.as_str(), "stored entry");
        Ok(())
    }

    fn delete_entry(&mut self, date: NaiveDate) -> Result<bool> {
        let conn = self.lock_conn()?;
        let removed = conn.execute(
            "DELETE FROM journal_entries WHERE date = ?1",
            [date_key(date)],
        )?;
        debug!(date = %date, removed, "deleted entry");
        Ok(removed > 0)
    }

    fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM journal_entries ORDER BY date DESC",
            SummaryRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], SummaryRow::from_row)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?.try_into()?);
        }
        Ok(summaries)
    }

    fn all_entries(&self) -> Result<Vec<JournalEntry>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM journal_entries ORDER BY date DESC",
            EntryRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], EntryRow::from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    fn get_password_record(&self) -> Result<Option<PasswordRecord>> {
        let conn = self.lock_conn()?;

        let row = conn
            .query_row(
                "SELECT salt, verifier, memory_kib, iterations, parallelism, created_at FROM password_record WHERE id = 1",
                [],
                RecordRow::from_row,
            )
            .optional()?;

        row.map(PasswordRecord::try_from).transpose()
    }

    fn set_password_record(&mut self, record: &PasswordRecord) -> Result<()> {
        let conn = self.lock_conn()?;
        Self::write_record(&conn, record)
    }

    fn clear_password_record(&mut self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM password_record", [])?;
        Ok(())
    }

    fn get_lockout(&self) -> Result<Option<LockoutState>> {
        let conn = self.lock_conn()?;

        let Some(failed) = Self::read_meta(&conn, LOCKOUT_FAILED_KEY)? else {
            return Ok(None);
        };
        let failed_attempts = failed
            .parse::<u32>()
            .map_err(|_| JournalError::Store(format!("Invalid failed attempt count '{}'", failed)))?;
        let locked_until = Self::read_meta(&conn, LOCKOUT_UNTIL_KEY)?
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Some(LockoutState {
            failed_attempts,
            locked_until,
        }))
    }

    fn set_lockout(&mut self, state: Option<&LockoutState>) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM meta WHERE key IN (?1, ?2)",
            [LOCKOUT_FAILED_KEY, LOCKOUT_UNTIL_KEY],
        )?;
        if let Some(state) = state {
            tx.execute(
                "INSERT INTO meta (key, value) VALUES (?1, ?2)",
                [LOCKOUT_FAILED_KEY.to_string(), state.failed_attempts.to_string()],
            )?;
            if let Some(until) = &state.locked_until {
                tx.execute(
                    "INSERT INTO meta (key, value) VALUES (?1, ?2)",
                    [LOCKOUT_UNTIL_KEY.to_string(), Self::timestamp(until)],
                )?;
            }
        }

        tx.commit()?;
        debug!(
            failed_attempts = state.map_or(0, |s| s.failed_attempts),
            "saved lockout state"
        );
        Ok(())
    }

    fn rewrite(
        &mut self,
        record: Option<&PasswordRecord>,
        entries: &[JournalEntry],
    ) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        match record {
            Some(record) => Self::write_record(&tx, record)?,
            None => {
                tx.execute("DELETE FROM password_record", [])?;
            }
        }
        for entry in entries {
            Self::write_entry(&tx, entry)?;
        }

        tx.commit()?;
        debug!(
            entries = entries.len(),
            protected = record.is_some(),
            "rewrote journal"
        );
        Ok(())
    }
}
