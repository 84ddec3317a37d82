//! Storage abstraction and the SQLite implementation.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{IntegrityReport, SqliteStore, SCHEMA_VERSION};
pub use traits::JournalStore;
pub use types::{
    date_key, DecryptedEntry, EntrySummary, JournalEntry, LockoutState, PasswordRecord,
};
