//! The journal guard: password protection and access control for entries.
//!
//! [`JournalGuard`] owns the store, the access gate, and the failed-attempt
//! tracker for one application run. The tracker is restored from the store on
//! open and saved back whenever it changes, so a lockout outlives the process. Every body that reaches the store passes
//! through the session's [`EntryCipher`]; every body that leaves it is
//! authenticated first.
//!
//! ## Lifecycle
//!
//! ```text
//! open(store)
//!   no password record -> Unlocked (pass-through)
//!   password record    -> Locked
//! unlock(password)     -> Unlocked (AEAD)  | InvalidCredential | LockedOut
//! wrong password       -> gate unchanged, failure counted and saved
//! lock() / idle        -> Locked
//! ```

pub mod gate;
pub mod lockout;
pub mod pending;

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use secrecy::SecretString;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::config::GuardConfig;
use crate::crypto::{
    derive_credentials, generate_salt, validate_password, verify_password, EntryCipher, EntryKey,
};
use crate::error::{JournalError, Result};
use crate::storage::{
    date_key, DecryptedEntry, EntrySummary, JournalEntry, JournalStore, PasswordRecord,
};

pub use gate::{AccessGate, GateState};
pub use lockout::AttemptTracker;
pub use pending::{PendingUnlock, UnlockOutcome};

/// Lowest accepted mood rating.
pub const MOOD_MIN: u8 = 1;
/// Highest accepted mood rating.
pub const MOOD_MAX: u8 = 5;

/// Password-protected access to a journal store.
pub struct JournalGuard<S: JournalStore> {
    store: S,
    gate: AccessGate,
    attempts: AttemptTracker,
    config: GuardConfig,
}

impl<S: JournalStore> JournalGuard<S> {
    /// Start a session over `store`.
    ///
    /// The gate starts `Locked` whenever a password record exists. Failed
    /// attempts and any active lockout are picked up from the store.
    pub fn open(store: S, config: GuardConfig) -> Result<Self> {
        let protected = store.get_password_record()?.is_some();
        let gate = if protected {
            AccessGate::locked(config.idle_timeout)
        } else {
            AccessGate::pass_through(config.idle_timeout)
        };
        let mut attempts = AttemptTracker::new(config.max_failed_attempts, config.lockout);
        if let Some(saved) = store.get_lockout()? {
            attempts = attempts.restore(saved, Utc::now());
        }

        info!(
            protected,
            failed_attempts = attempts.failed_attempts(),
            "journal session opened"
        );
        Ok(Self {
            store,
            gate,
            attempts,
            config,
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Direct access to the store for maintenance (backup, integrity checks).
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_protected(&self) -> Result<bool> {
        Ok(self.store.get_password_record()?.is_some())
    }

    /// Current gate state, after applying the idle timeout.
    pub fn state(&mut self) -> GateState {
        self.state_at(Instant::now())
    }

    pub fn state_at(&mut self, now: Instant) -> GateState {
        if self.gate.expire_idle_at(now) {
            info!("journal locked after idle timeout");
        }
        self.gate.state()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.attempts.failed_attempts()
    }

    /// Attempts left before lockout, `None` when lockout is disabled.
    pub fn remaining_attempts(&self) -> Option<u32> {
        self.attempts.remaining_attempts()
    }

    // --- Protection lifecycle ---

    /// Turn on password protection.
    ///
    /// Seals every existing pass-through entry under the new key in one store
    /// transaction, then leaves the session unlocked.
    pub fn enable_protection(&mut self, password: &str) -> Result<()> {
        if self.store.get_password_record()?.is_some() {
            return Err(JournalError::AlreadyProtected);
        }
        validate_password(password)?;

        let entries = self.store.all_entries()?;
        let (record, cipher) = self.new_credentials(password)?;
        let resealed = reseal(&entries, &EntryCipher::PassThrough, &cipher)?;

        self.store.rewrite(Some(&record), &resealed)?;
        self.clear_attempts()?;
        self.gate.open_with(cipher, Instant::now());

        info!(entries = resealed.len(), "journal protection enabled");
        Ok(())
    }

    /// Turn off password protection after verifying `current`.
    ///
    /// Every sealed entry is opened and rewritten as pass-through, and the
    /// password record is removed, in one store transaction.
    pub fn disable_protection(&mut self, current: &str) -> Result<()> {
        let record = self.require_record()?;
        let key = self.verify_attempt(&record, current)?;

        let entries = self.store.all_entries()?;
        let resealed = reseal(&entries, &EntryCipher::Aead(key), &EntryCipher::PassThrough)?;

        self.store.rewrite(None, &resealed)?;
        self.gate = AccessGate::pass_through(self.config.idle_timeout);

        info!(entries = resealed.len(), "journal protection disabled");
        Ok(())
    }

    /// Replace the password, re-sealing every entry under a fresh key.
    pub fn change_password(&mut self, current: &str, new_password: &str) -> Result<()> {
        validate_password(new_password)?;
        let record = self.require_record()?;
        let old_key = self.verify_attempt(&record, current)?;

        let entries = self.store.all_entries()?;
        let (new_record, cipher) = self.new_credentials(new_password)?;
        let resealed = reseal(&entries, &EntryCipher::Aead(old_key), &cipher)?;

        self.store.rewrite(Some(&new_record), &resealed)?;
        self.gate.open_with(cipher, Instant::now());

        info!(entries = resealed.len(), "journal password changed");
        Ok(())
    }

    // --- Unlock / lock ---

    /// Verify `password` and unlock the session.
    ///
    /// A wrong password leaves the gate as it was and counts toward lockout.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        let record = self.require_record()?;
        let key = self.verify_attempt(&record, password)?;

        self.gate.open_with(EntryCipher::Aead(key), Instant::now());
        info!("journal unlocked");
        Ok(())
    }

    /// Start verifying `password` on a worker thread.
    ///
    /// Lockout is checked up front, so a locked-out caller never starts a
    /// derivation. Complete with [`finish_unlock`](Self::finish_unlock).
    pub fn begin_unlock(&mut self, password: &str) -> Result<PendingUnlock> {
        let record = self.require_record()?;
        self.check_lockout()?;
        if password.is_empty() {
            return Err(JournalError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }

        PendingUnlock::spawn(record, SecretString::from(password.to_string()))
    }

    /// Apply a background derivation result to the session.
    ///
    /// If the password record changed while the derivation was running, the
    /// outcome is stale and rejected as `InvalidCredential`. Neither a stale
    /// nor a failed outcome changes the gate.
    pub fn finish_unlock(&mut self, outcome: UnlockOutcome) -> Result<()> {
        let record = self.require_record()?;

        if !record.same_secret(&outcome.record) {
            warn!("discarded unlock result for a replaced password record");
            return Err(JournalError::InvalidCredential);
        }

        let key = self.settle_attempt(outcome.result)?;
        self.gate.open_with(EntryCipher::Aead(key), Instant::now());
        info!("journal unlocked");
        Ok(())
    }

    /// Lock the session and drop the key. No-op for unprotected journals.
    pub fn lock(&mut self) {
        if self.gate.is_pass_through() {
            return;
        }
        self.gate.lock();
        info!("journal locked");
    }

    // --- Entries ---

    /// Read and open the entry for `date`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if there is no entry for that day.
    ///
    /// # Errors
    ///
    /// `AccessDenied` while locked; `TamperedOrWrongKey` if the stored body
    /// does not authenticate.
    pub fn read_entry(&mut self, date: NaiveDate) -> Result<Option<DecryptedEntry>> {
        self.read_entry_at(date, Instant::now())
    }

    pub fn read_entry_at(&mut self, date: NaiveDate, now: Instant) -> Result<Option<DecryptedEntry>> {
        let cipher = self.gate.cipher_at(now)?;
        let Some(entry) = self.store.get_entry(date)? else {
            return Ok(None);
        };

        open_entry(cipher, &entry).map(Some)
    }

    /// Seal and store `plaintext` as the entry for `date`, keeping any mood.
    pub fn write_entry(&mut self, date: NaiveDate, plaintext: &str) -> Result<()> {
        self.store_entry(date, plaintext, None, Instant::now())
    }

    /// Like [`write_entry`](Self::write_entry), also setting the mood (1..=5).
    pub fn write_entry_with_mood(&mut self, date: NaiveDate, plaintext: &str, mood: u8) -> Result<()> {
        if !(MOOD_MIN..=MOOD_MAX).contains(&mood) {
            return Err(JournalError::InvalidInput(format!(
                "Mood must be between {} and {} (got {})",
                MOOD_MIN, MOOD_MAX, mood
            )));
        }
        self.store_entry(date, plaintext, Some(mood), Instant::now())
    }

    pub fn write_entry_at(&mut self, date: NaiveDate, plaintext: &str, now: Instant) -> Result<()> {
        self.store_entry(date, plaintext, None, now)
    }

    fn store_entry(
        &mut self,
        date: NaiveDate,
        plaintext: &str,
        mood: Option<u8>,
        now: Instant,
    ) -> Result<()> {
        let cipher = self.gate.cipher_at(now)?;
        let body = cipher.seal_body(plaintext.as_bytes(), date_key(date).as_bytes())?;

        let timestamp = Utc::now();
        let existing = self.store.get_entry(date)?;
        let (created_at, previous_mood) = existing
            .map(|e| (e.created_at, e.mood))
            .unwrap_or((timestamp, None));

        self.store.put_entry(&JournalEntry {
            date,
            body,
            mood: mood.or(previous_mood),
            created_at,
            updated_at: timestamp,
        })
    }

    /// Remove the entry for `date`. Returns `Ok(false)` if there was none.
    pub fn delete_entry(&mut self, date: NaiveDate) -> Result<bool> {
        self.gate.cipher_at(Instant::now())?;
        let removed = self.store.delete_entry(date)?;
        if removed {
            info!(date = %date, "entry deleted");
        }
        Ok(removed)
    }

    /// Entry metadata, newest first. Allowed while locked; no body is exposed.
    pub fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        self.store.list_entries()
    }

    /// Case-insensitive substring search over opened bodies, newest first.
    pub fn search_entries(&mut self, query: &str) -> Result<Vec<DecryptedEntry>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(JournalError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let cipher = self.gate.cipher_at(Instant::now())?;
        let mut matches = Vec::new();
        for entry in self.store.all_entries()? {
            let opened = open_entry(cipher, &entry)?;
            if opened.body.to_lowercase().contains(&needle) {
                matches.push(opened);
            }
        }
        Ok(matches)
    }

    // --- Helpers ---

    fn require_record(&self) -> Result<PasswordRecord> {
        self.store
            .get_password_record()?
            .ok_or(JournalError::NotProtected)
    }

    fn new_credentials(&self, password: &str) -> Result<(PasswordRecord, EntryCipher)> {
        let salt = generate_salt();
        let credentials = derive_credentials(password, &salt, &self.config.kdf)?;
        let record = PasswordRecord::new(
            salt.to_vec(),
            credentials.verifier.to_vec(),
            self.config.kdf,
        );
        Ok((record, EntryCipher::Aead(credentials.key)))
    }

    /// Run one password check against `record` with lockout bookkeeping.
    fn verify_attempt(&mut self, record: &PasswordRecord, password: &str) -> Result<EntryKey> {
        self.check_lockout()?;
        let result = verify_password(password, &record.salt, &record.kdf, &record.verifier);
        self.settle_attempt(result)
    }

    /// Refuse while locked out. Clearing an expired lockout is saved.
    fn check_lockout(&mut self) -> Result<()> {
        let before = self.attempts.state();
        let checked = self.attempts.check_at(Utc::now());
        if self.attempts.state() != before {
            self.save_attempts()?;
        }
        checked
    }

    /// Count the result of a password check. The gate is left as it was.
    fn settle_attempt(&mut self, result: Result<EntryKey>) -> Result<EntryKey> {
        match result {
            Ok(key) => {
                self.clear_attempts()?;
                Ok(key)
            }
            Err(JournalError::InvalidCredential) => {
                self.attempts.record_failure_at(Utc::now());
                warn!(
                    failed_attempts = self.attempts.failed_attempts(),
                    "incorrect journal password"
                );
                self.save_attempts()?;
                Err(JournalError::InvalidCredential)
            }
            Err(e) => Err(e),
        }
    }

    fn clear_attempts(&mut self) -> Result<()> {
        if self.attempts.state().is_none() {
            return Ok(());
        }
        self.attempts.reset();
        self.save_attempts()
    }

    fn save_attempts(&mut self) -> Result<()> {
        let state = self.attempts.state();
        self.store.set_lockout(state.as_ref())
    }
}

impl<S: JournalStore> std::fmt::Debug for JournalGuard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalGuard")
            .field("gate", &self.gate.state())
            .field("failed_attempts", &self.attempts.failed_attempts())
            .finish_non_exhaustive()
    }
}

fn open_entry(cipher: &EntryCipher, entry: &JournalEntry) -> Result<DecryptedEntry> {
    let plaintext = cipher
        .open_body(&entry.body, date_key(entry.date).as_bytes())
        .inspect_err(|_| warn!(date = %entry.date, "entry failed authentication"))?;
    let body = String::from_utf8(plaintext).map_err(|_| JournalError::TamperedOrWrongKey)?;

    Ok(DecryptedEntry {
        date: entry.date,
        body,
        mood: entry.mood,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    })
}

/// Open every entry with `from` and seal it again with `to`.
fn reseal(entries: &[JournalEntry], from: &EntryCipher, to: &EntryCipher) -> Result<Vec<JournalEntry>> {
    entries
        .iter()
        .map(|entry| {
            let aad = date_key(entry.date);
            let plaintext = Zeroizing::new(from.open_body(&entry.body, aad.as_bytes())?);
            Ok(entry.with_body(to.seal_body(&plaintext, aad.as_bytes())?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CipherScheme, KdfParams};
    use crate::storage::{LockoutState, SqliteStore};
    use std::time::Duration;

    fn test_config() -> GuardConfig {
        GuardConfig::default().with_kdf(KdfParams::new(8 * 1024, 1, 1))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn unprotected() -> JournalGuard<SqliteStore> {
        JournalGuard::open(SqliteStore::open_in_memory().unwrap(), test_config()).unwrap()
    }

    fn protected(password: &str) -> JournalGuard<SqliteStore> {
        let mut guard = unprotected();
        guard.enable_protection(password).unwrap();
        guard
    }

    /// Store whose every call fails.
    struct BrokenStore;

    impl JournalStore for BrokenStore {
        fn get_entry(&self, _: NaiveDate) -> Result<Option<JournalEntry>> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn put_entry(&mut self, _: &JournalEntry) -> Result<()> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn delete_entry(&mut self, _: NaiveDate) -> Result<bool> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn list_entries(&self) -> Result<Vec<EntrySummary>> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn all_entries(&self) -> Result<Vec<JournalEntry>> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn get_password_record(&self) -> Result<Option<PasswordRecord>> {
            Ok(None)
        }
        fn set_password_record(&mut self, _: &PasswordRecord) -> Result<()> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn clear_password_record(&mut self) -> Result<()> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn get_lockout(&self) -> Result<Option<LockoutState>> {
            Ok(None)
        }
        fn set_lockout(&mut self, _: Option<&LockoutState>) -> Result<()> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
        fn rewrite(&mut self, _: Option<&PasswordRecord>, _: &[JournalEntry]) -> Result<()> {
            Err(JournalError::Store("disk unavailable".to_string()))
        }
    }

    #[test]
    fn test_unprotected_journal_is_open() {
        let mut guard = unprotected();

        assert!(!guard.is_protected().unwrap());
        assert_eq!(guard.state(), GateState::Unlocked);

        guard.write_entry(day(1), "hello").unwrap();
        let entry = guard.read_entry(day(1)).unwrap().unwrap();
        assert_eq!(entry.body, "hello");
        assert_eq!(
            guard.store().get_entry(day(1)).unwrap().unwrap().body.scheme,
            CipherScheme::PassThrough
        );
    }

    #[test]
    fn test_lock_is_noop_when_unprotected() {
        let mut guard = unprotected();
        guard.lock();
        assert_eq!(guard.state(), GateState::Unlocked);
    }

    #[test]
    fn test_enable_leaves_session_unlocked() {
        let mut guard = protected("orange17");

        assert!(guard.is_protected().unwrap());
        assert_eq!(guard.state(), GateState::Unlocked);

        guard.write_entry(day(1), "hello").unwrap();
        let stored = guard.store().get_entry(day(1)).unwrap().unwrap();
        assert_eq!(stored.body.scheme, CipherScheme::XChaCha20Poly1305);
        assert_ne!(stored.body.ciphertext, b"hello");
    }

    #[test]
    fn test_enable_twice_fails() {
        let mut guard = protected("orange17");
        assert!(matches!(
            guard.enable_protection("another-password"),
            Err(JournalError::AlreadyProtected)
        ));
    }

    #[test]
    fn test_enable_rejects_weak_password() {
        let mut guard = unprotected();
        assert!(matches!(
            guard.enable_protection("short"),
            Err(JournalError::InvalidInput(_))
        ));
        assert!(!guard.is_protected().unwrap());
    }

    #[test]
    fn test_locked_access_is_denied() {
        let mut guard = protected("orange17");
        guard.write_entry(day(1), "hello").unwrap();
        guard.lock();

        assert_eq!(guard.state(), GateState::Locked);
        assert!(matches!(guard.read_entry(day(1)), Err(JournalError::AccessDenied)));
        assert!(matches!(guard.write_entry(day(2), "x"), Err(JournalError::AccessDenied)));
        assert!(matches!(guard.delete_entry(day(1)), Err(JournalError::AccessDenied)));
        assert!(matches!(guard.search_entries("hello"), Err(JournalError::AccessDenied)));

        // metadata stays visible
        assert_eq!(guard.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_unlock_with_wrong_password() {
        let mut guard = protected("orange17");
        guard.lock();

        assert!(matches!(guard.unlock("wrong"), Err(JournalError::InvalidCredential)));
        assert_eq!(guard.state(), GateState::Locked);
        assert_eq!(guard.failed_attempts(), 1);

        guard.unlock("orange17").unwrap();
        assert_eq!(guard.state(), GateState::Unlocked);
        assert_eq!(guard.failed_attempts(), 0);
    }

    #[test]
    fn test_wrong_current_password_keeps_session_open() {
        let mut guard = protected("orange17");
        guard.write_entry(day(1), "hello").unwrap();

        assert!(matches!(
            guard.change_password("orange71", "lemon-42x"),
            Err(JournalError::InvalidCredential)
        ));
        assert_eq!(guard.state(), GateState::Unlocked);
        assert!(matches!(
            guard.disable_protection("orange71"),
            Err(JournalError::InvalidCredential)
        ));
        assert_eq!(guard.state(), GateState::Unlocked);
        assert_eq!(guard.failed_attempts(), 2);

        assert_eq!(guard.read_entry(day(1)).unwrap().unwrap().body, "hello");
        assert!(guard.is_protected().unwrap());
    }

    #[test]
    fn test_failures_are_saved_to_the_store() {
        let mut guard = protected("orange17");
        guard.lock();

        assert!(guard.unlock("wrong").is_err());
        assert!(guard.unlock("wrong").is_err());
        assert_eq!(
            guard.store().get_lockout().unwrap(),
            Some(LockoutState {
                failed_attempts: 2,
                locked_until: None,
            })
        );

        guard.unlock("orange17").unwrap();
        assert_eq!(guard.store().get_lockout().unwrap(), None);
    }

    #[test]
    fn test_open_restores_saved_lockout() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .set_lockout(Some(&LockoutState {
                failed_attempts: 3,
                locked_until: None,
            }))
            .unwrap();

        let guard = JournalGuard::open(store, test_config()).unwrap();

        assert_eq!(guard.failed_attempts(), 3);
        assert_eq!(guard.remaining_attempts(), Some(2));
    }

    #[test]
    fn test_unlock_unprotected_fails() {
        let mut guard = unprotected();
        assert!(matches!(guard.unlock("orange17"), Err(JournalError::NotProtected)));
    }

    #[test]
    fn test_lockout_after_repeated_failures() {
        let mut guard = protected("orange17");
        guard.lock();

        for _ in 0..5 {
            assert!(matches!(guard.unlock("wrong"), Err(JournalError::InvalidCredential)));
        }

        // even the right password is refused during lockout
        assert!(matches!(
            guard.unlock("orange17"),
            Err(JournalError::LockedOut { .. })
        ));
        assert_eq!(guard.remaining_attempts(), Some(0));
    }

    #[test]
    fn test_idle_timeout_locks_session() {
        let config = test_config().with_idle_timeout(Some(Duration::from_secs(60)));
        let mut guard = JournalGuard::open(SqliteStore::open_in_memory().unwrap(), config).unwrap();
        guard.enable_protection("orange17").unwrap();

        let start = Instant::now();
        guard.write_entry_at(day(1), "hello", start).unwrap();
        assert!(guard.read_entry_at(day(1), start + Duration::from_secs(30)).is_ok());

        let later = start + Duration::from_secs(120);
        assert!(matches!(
            guard.read_entry_at(day(1), later),
            Err(JournalError::AccessDenied)
        ));
        assert_eq!(guard.state_at(later), GateState::Locked);
    }

    #[test]
    fn test_write_keeps_created_at_and_mood() {
        let mut guard = unprotected();
        guard.write_entry_with_mood(day(1), "first", 4).unwrap();
        let first = guard.read_entry(day(1)).unwrap().unwrap();

        guard.write_entry(day(1), "second").unwrap();
        let second = guard.read_entry(day(1)).unwrap().unwrap();

        assert_eq!(second.body, "second");
        assert_eq!(second.mood, Some(4));
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_mood_out_of_range() {
        let mut guard = unprotected();
        assert!(matches!(
            guard.write_entry_with_mood(day(1), "meh", 0),
            Err(JournalError::InvalidInput(_))
        ));
        assert!(matches!(
            guard.write_entry_with_mood(day(1), "great", 6),
            Err(JournalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_missing_entry() {
        let mut guard = protected("orange17");
        assert!(guard.read_entry(day(9)).unwrap().is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut guard = protected("orange17");
        guard.write_entry(day(1), "Walked the dog").unwrap();
        guard.write_entry(day(2), "Rainy day").unwrap();
        guard.write_entry(day(3), "Dog park again").unwrap();

        let hits: Vec<_> = guard
            .search_entries("DOG")
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(hits, vec![day(3), day(1)]);

        assert!(matches!(
            guard.search_entries("   "),
            Err(JournalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_entry() {
        let mut guard = protected("orange17");
        guard.write_entry(day(1), "hello").unwrap();

        assert!(guard.delete_entry(day(1)).unwrap());
        assert!(!guard.delete_entry(day(1)).unwrap());
    }

    #[test]
    fn test_background_unlock_matches_unlock() {
        let mut guard = protected("orange17");
        guard.write_entry(day(1), "hello").unwrap();
        guard.lock();

        let pending = guard.begin_unlock("orange17").unwrap();
        guard.finish_unlock(pending.wait()).unwrap();
        assert_eq!(guard.read_entry(day(1)).unwrap().unwrap().body, "hello");

        guard.lock();
        let pending = guard.begin_unlock("wrong").unwrap();
        assert!(matches!(
            guard.finish_unlock(pending.wait()),
            Err(JournalError::InvalidCredential)
        ));
        assert_eq!(guard.state(), GateState::Locked);
        assert_eq!(guard.failed_attempts(), 1);
    }

    #[test]
    fn test_stale_background_unlock_is_rejected() {
        let mut guard = protected("orange17");
        let pending = guard.begin_unlock("orange17").unwrap();
        let outcome = pending.wait();

        guard.change_password("orange17", "lemon-42x").unwrap();
        guard.lock();

        assert!(matches!(
            guard.finish_unlock(outcome),
            Err(JournalError::InvalidCredential)
        ));
        assert_eq!(guard.state(), GateState::Locked);
    }

    #[test]
    fn test_stale_outcome_keeps_open_session_open() {
        let mut guard = protected("orange17");
        guard.lock();
        let outcome = guard.begin_unlock("orange17").unwrap().wait();

        guard.unlock("orange17").unwrap();
        guard.change_password("orange17", "lemon-42x").unwrap();

        assert!(matches!(
            guard.finish_unlock(outcome),
            Err(JournalError::InvalidCredential)
        ));
        assert_eq!(guard.state(), GateState::Unlocked);
    }

    #[test]
    fn test_begin_unlock_respects_lockout() {
        let config = test_config().with_lockout(1, Duration::from_secs(60));
        let mut guard = JournalGuard::open(SqliteStore::open_in_memory().unwrap(), config).unwrap();
        guard.enable_protection("orange17").unwrap();
        guard.lock();

        assert!(guard.unlock("wrong").is_err());
        assert!(matches!(
            guard.begin_unlock("orange17"),
            Err(JournalError::LockedOut { .. })
        ));
    }

    #[test]
    fn test_store_failure_is_surfaced() {
        let mut guard = JournalGuard::open(BrokenStore, test_config()).unwrap();

        assert!(matches!(
            guard.write_entry(day(1), "hello"),
            Err(JournalError::Store(_))
        ));
        assert!(matches!(guard.read_entry(day(1)), Err(JournalError::Store(_))));
        assert!(matches!(
            guard.enable_protection("orange17"),
            Err(JournalError::Store(_))
        ));
    }
}
