use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use origami_core::crypto::{CipherScheme, KdfParams};
use origami_core::{GateState, GuardConfig, JournalError, JournalGuard, JournalStore, SqliteStore};

struct TempJournal {
    dir: PathBuf,
}

impl TempJournal {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let dirname = format!("{}_{}_{}", prefix, std::process::id(), nanos);
        let dir = std::env::temp_dir().join(dirname);
        Self { dir }
    }

    fn db(&self) -> PathBuf {
        self.dir.join("journal.db")
    }

    fn open(&self) -> JournalGuard<SqliteStore> {
        let store = SqliteStore::open(&self.db()).expect("store should open");
        JournalGuard::open(store, config()).expect("guard should open")
    }
}

impl Drop for TempJournal {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn config() -> GuardConfig {
    GuardConfig::default().with_kdf(KdfParams::new(8 * 1024, 1, 1))
}

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

fn day_two() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date")
}

#[test]
fn test_protected_journal_survives_reopen() {
    let temp = TempJournal::new("origami_reopen");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), "hello").expect("write should succeed");
        guard.lock();
    }

    let mut guard = temp.open();
    assert_eq!(guard.state(), GateState::Locked);
    assert!(matches!(
        guard.read_entry(new_year()),
        Err(JournalError::AccessDenied)
    ));

    assert!(matches!(
        guard.unlock("wrong"),
        Err(JournalError::InvalidCredential)
    ));
    assert_eq!(guard.state(), GateState::Locked);

    guard.unlock("orange17").expect("unlock should succeed");
    let entry = guard
        .read_entry(new_year())
        .expect("read should succeed")
        .expect("entry should exist");
    assert_eq!(entry.body, "hello");
}

#[test]
fn test_no_plaintext_on_disk_when_protected() {
    let temp = TempJournal::new("origami_no_plaintext");
    let marker = "ZEBRA-MARKER-4471 my private thoughts";

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), marker).expect("write should succeed");
    }

    let on_disk = fs::read(temp.db()).expect("read should succeed");
    let needle = b"ZEBRA-MARKER-4471";
    assert!(!on_disk.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_enable_overwrites_plaintext_on_disk() {
    let temp = TempJournal::new("origami_enable_overwrites");

    {
        let mut guard = temp.open();
        guard
            .write_entry(new_year(), "OKAPI-MARKER-9902 before protection")
            .expect("write should succeed");
        guard.enable_protection("orange17").expect("enable should succeed");
    }

    let on_disk = fs::read(temp.db()).expect("read should succeed");
    let needle = b"OKAPI-MARKER-9902";
    assert!(!on_disk.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_enable_seals_existing_entries() {
    let temp = TempJournal::new("origami_enable_seals");
    let mut guard = temp.open();

    guard.write_entry(new_year(), "written before protection").expect("write should succeed");
    assert_eq!(
        guard.list_entries().expect("list should succeed")[0].scheme,
        CipherScheme::PassThrough
    );

    guard.enable_protection("orange17").expect("enable should succeed");

    let summaries = guard.list_entries().expect("list should succeed");
    assert_eq!(summaries[0].scheme, CipherScheme::XChaCha20Poly1305);

    guard.lock();
    guard.unlock("orange17").expect("unlock should succeed");
    assert_eq!(
        guard.read_entry(new_year()).unwrap().unwrap().body,
        "written before protection"
    );
}

#[test]
fn test_disable_reencrypts_to_pass_through() {
    let temp = TempJournal::new("origami_disable");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), "hello").expect("write should succeed");
        guard.write_entry(day_two(), "world").expect("write should succeed");
        guard.lock();

        assert!(matches!(
            guard.disable_protection("wrong"),
            Err(JournalError::InvalidCredential)
        ));
        guard.disable_protection("orange17").expect("disable should succeed");
        assert!(!guard.is_protected().unwrap());
    }

    let mut guard = temp.open();
    assert_eq!(guard.state(), GateState::Unlocked);
    for summary in guard.list_entries().unwrap() {
        assert_eq!(summary.scheme, CipherScheme::PassThrough);
    }
    assert_eq!(guard.read_entry(day_two()).unwrap().unwrap().body, "world");
}

#[test]
fn test_disable_when_unprotected_fails() {
    let temp = TempJournal::new("origami_disable_unprotected");
    let mut guard = temp.open();

    assert!(matches!(
        guard.disable_protection("orange17"),
        Err(JournalError::NotProtected)
    ));
}

#[test]
fn test_change_password() {
    let temp = TempJournal::new("origami_change_password");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), "hello").expect("write should succeed");

        assert!(matches!(
            guard.change_password("wrong", "lemon-42x"),
            Err(JournalError::InvalidCredential)
        ));
        guard
            .change_password("orange17", "lemon-42x")
            .expect("change should succeed");
    }

    let mut guard = temp.open();
    assert!(matches!(
        guard.unlock("orange17"),
        Err(JournalError::InvalidCredential)
    ));
    guard.unlock("lemon-42x").expect("unlock should succeed");
    assert_eq!(guard.read_entry(new_year()).unwrap().unwrap().body, "hello");
}

#[test]
fn test_lockout_survives_reopen() {
    let temp = TempJournal::new("origami_lockout_reopen");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.lock();

        for _ in 0..5 {
            assert!(matches!(
                guard.unlock("wrong"),
                Err(JournalError::InvalidCredential)
            ));
        }
        assert!(matches!(
            guard.unlock("orange17"),
            Err(JournalError::LockedOut { .. })
        ));
    }

    let mut guard = temp.open();
    assert_eq!(guard.state(), GateState::Locked);
    assert_eq!(guard.failed_attempts(), 5);
    assert_eq!(guard.remaining_attempts(), Some(0));
    assert!(matches!(
        guard.unlock("orange17"),
        Err(JournalError::LockedOut { .. })
    ));
    assert!(matches!(
        guard.begin_unlock("orange17"),
        Err(JournalError::LockedOut { .. })
    ));
}

#[test]
fn test_partial_failures_carry_over_and_clear_on_success() {
    let temp = TempJournal::new("origami_partial_failures");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.lock();
        assert!(guard.unlock("wrong").is_err());
        assert!(guard.unlock("wrong").is_err());
    }

    {
        let mut guard = temp.open();
        assert_eq!(guard.failed_attempts(), 2);
        assert_eq!(guard.remaining_attempts(), Some(3));
        guard.unlock("orange17").expect("unlock should succeed");
    }

    let guard = temp.open();
    assert_eq!(guard.failed_attempts(), 0);
    assert!(guard.store().get_lockout().expect("lockout should load").is_none());
}

#[test]
fn test_moved_body_is_detected() {
    let temp = TempJournal::new("origami_moved_body");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), "hello").expect("write should succeed");

        let mut store = guard.into_store();
        let mut moved = store.get_entry(new_year()).unwrap().unwrap();
        moved.date = day_two();
        store.put_entry(&moved).expect("put should succeed");
    }

    let mut guard = temp.open();
    guard.unlock("orange17").expect("unlock should succeed");
    assert_eq!(guard.read_entry(new_year()).unwrap().unwrap().body, "hello");
    assert!(matches!(
        guard.read_entry(day_two()),
        Err(JournalError::TamperedOrWrongKey)
    ));
    assert!(matches!(
        guard.search_entries("hello"),
        Err(JournalError::TamperedOrWrongKey)
    ));
}

#[test]
fn test_plain_body_injected_into_protected_journal() {
    let temp = TempJournal::new("origami_injected");

    {
        let mut guard = temp.open();
        guard.write_entry(day_two(), "planted").expect("write should succeed");
        let planted = guard.into_store().get_entry(day_two()).unwrap().unwrap();

        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        let mut store = guard.into_store();
        store.put_entry(&planted).expect("put should succeed");
    }

    let mut guard = temp.open();
    guard.unlock("orange17").expect("unlock should succeed");
    assert!(matches!(
        guard.read_entry(day_two()),
        Err(JournalError::TamperedOrWrongKey)
    ));
}

#[test]
fn test_backup_keeps_bodies_sealed() {
    let temp = TempJournal::new("origami_backup");
    let backup = temp.dir.join("backup.db");

    {
        let mut guard = temp.open();
        guard.enable_protection("orange17").expect("enable should succeed");
        guard.write_entry(new_year(), "hello").expect("write should succeed");
        guard.store().backup_to(&backup).expect("backup should succeed");
    }

    let store = SqliteStore::open(&backup).expect("backup should open");
    assert!(store.check_integrity().unwrap().is_ok());

    let mut guard = JournalGuard::open(store, config()).expect("guard should open");
    assert_eq!(guard.state(), GateState::Locked);
    guard.unlock("orange17").expect("unlock should succeed");
    assert_eq!(guard.read_entry(new_year()).unwrap().unwrap().body, "hello");
}
