//! Guard configuration.

use std::time::Duration;

use crate::crypto::KdfParams;

/// Failed unlock attempts allowed before a temporary lockout.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long unlock attempts are refused once the limit is hit.
pub const DEFAULT_LOCKOUT: Duration = Duration::from_secs(60);

/// Runtime settings for a [`JournalGuard`](crate::guard::JournalGuard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Lock an unlocked session after this much inactivity. `None` disables.
    pub idle_timeout: Option<Duration>,

    /// Consecutive failures before lockout. `0` disables lockout.
    pub max_failed_attempts: u32,

    /// Lockout duration.
    pub lockout: Duration,

    /// Argon2id cost for newly created password records. Existing records
    /// keep the parameters they were created with.
    pub kdf: KdfParams,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            idle_timeout: None,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout: DEFAULT_LOCKOUT,
            kdf: KdfParams::default(),
        }
    }
}

impl GuardConfig {
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_lockout(mut self, max_failed_attempts: u32, lockout: Duration) -> Self {
        self.max_failed_attempts = max_failed_attempts;
        self.lockout = lockout;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}
