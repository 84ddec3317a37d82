//! Store collaborator trait definition.
//!
//! The journal guard never touches files or databases directly. Everything it
//! persists goes through `JournalStore`, and any failure comes back as the
//! opaque `JournalError::Store`.

use chrono::NaiveDate;

use super::types::{EntrySummary, JournalEntry, LockoutState, PasswordRecord};
use crate::error::Result;

/// Persistence interface consumed by the journal guard.
///
/// Implementations store bodies exactly as given; they never see plaintext
/// unless the journal is unprotected.
pub trait JournalStore {
    /// Get the entry for a calendar day.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(entry))` if found, `Ok(None)` if not found.
    fn get_entry(&self, date: NaiveDate) -> Result<Option<JournalEntry>>;

    /// Insert or replace the entry for `entry.date`.
    fn put_entry(&mut self, entry: &JournalEntry) -> Result<()>;

    /// Remove the entry for a calendar day.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if an entry was removed, `Ok(false)` if none existed.
    fn delete_entry(&mut self, date: NaiveDate) -> Result<bool>;

    /// List entry metadata, newest date first.
    fn list_entries(&self) -> Result<Vec<EntrySummary>>;

    /// Load every stored entry, newest date first.
    fn all_entries(&self) -> Result<Vec<JournalEntry>>;

    /// Get the password record, if protection is enabled.
    fn get_password_record(&self) -> Result<Option<PasswordRecord>>;

    /// Create or replace the password record.
    fn set_password_record(&mut self, record: &PasswordRecord) -> Result<()>;

    /// Remove the password record.
    fn clear_password_record(&mut self) -> Result<()>;

    /// Get the saved failed-unlock state, `None` when there is nothing to
    /// carry over. Readable while the journal is locked.
    fn get_lockout(&self) -> Result<Option<LockoutState>>;

    /// Save the failed-unlock state, or clear it when `None`.
    ///
    /// Holds no secret, so it is writable while the journal is locked.
    fn set_lockout(&mut self, state: Option<&LockoutState>) -> Result<()>;

    /// Atomically replace the password record (or clear it when `None`) and
    /// overwrite the given entries.
    ///
    /// Used when protection is enabled, disabled, or the password changes, so
    /// a failure can never leave bodies sealed under a key no record verifies.
    fn rewrite(&mut self, record: Option<&PasswordRecord>, entries: &[JournalEntry])
        -> Result<()>;
}
