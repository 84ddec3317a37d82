//! # Origami Core
//!
//! Password protection and access control for the Origami journal.
//!
//! This crate owns everything between the journal UI and the database:
//! deriving keys from the user's password, sealing entry bodies, and the
//! locked/unlocked session that decides who may read them. It performs no
//! terminal I/O; the `origami` CLI is one consumer.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id credentials, XChaCha20-Poly1305 entry cipher, password policy
//! - **guard**: `JournalGuard` session, access gate, lockout, background unlock
//! - **storage**: `JournalStore` trait and the SQLite implementation
//! - **config**: guard settings (idle timeout, lockout, KDF cost)
//! - **fs**: atomic file replacement helpers
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use origami_core::crypto::KdfParams;
//! use origami_core::{GuardConfig, JournalGuard, SqliteStore};
//!
//! let config = GuardConfig::default().with_kdf(KdfParams::new(8 * 1024, 1, 1));
//! let mut guard = JournalGuard::open(SqliteStore::open_in_memory()?, config)?;
//! guard.enable_protection("orange17")?;
//!
//! let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! guard.write_entry(day, "hello")?;
//! guard.lock();
//! assert!(guard.read_entry(day).is_err());
//!
//! guard.unlock("orange17")?;
//! assert_eq!(guard.read_entry(day)?.unwrap().body, "hello");
//! # Ok::<(), origami_core::JournalError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod guard;
pub mod storage;

pub use config::GuardConfig;
pub use error::{JournalError, Result};
pub use guard::{GateState, JournalGuard, PendingUnlock, UnlockOutcome};
pub use storage::{JournalStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
