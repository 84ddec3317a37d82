//! Access gate state machine.
//!
//! ```text
//! Locked --unlock(ok)--> Unlocked --lock() / idle--> Locked
//! ```
//!
//! Unprotected journals get a gate that is permanently unlocked with the
//! pass-through cipher.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::crypto::EntryCipher;
use crate::error::{JournalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Locked,
    Unlocked,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
        }
    }
}

#[derive(Debug)]
enum Session {
    Locked,
    Unlocked {
        cipher: EntryCipher,
        last_access: Instant,
    },
}

#[derive(Debug)]
pub struct AccessGate {
    session: Session,
    idle_timeout: Option<Duration>,
}

impl AccessGate {
    pub fn locked(idle_timeout: Option<Duration>) -> Self {
        Self {
            session: Session::Locked,
            idle_timeout,
        }
    }

    pub fn pass_through(idle_timeout: Option<Duration>) -> Self {
        Self {
            session: Session::Unlocked {
                cipher: EntryCipher::PassThrough,
                last_access: Instant::now(),
            },
            idle_timeout,
        }
    }

    pub fn state(&self) -> GateState {
        match self.session {
            Session::Locked => GateState::Locked,
            Session::Unlocked { .. } => GateState::Unlocked,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(
            self.session,
            Session::Unlocked {
                cipher: EntryCipher::PassThrough,
                ..
            }
        )
    }

    /// Install a cipher and mark the gate unlocked.
    pub fn open_with(&mut self, cipher: EntryCipher, now: Instant) {
        self.session = Session::Unlocked {
            cipher,
            last_access: now,
        };
    }

    /// Drop the session key. Pass-through gates stay unlocked.
    pub fn lock(&mut self) {
        if !self.is_pass_through() {
            self.session = Session::Locked;
        }
    }

    /// Lock if the session has been idle longer than the timeout.
    ///
    /// Returns `true` if this call locked the gate.
    pub fn expire_idle_at(&mut self, now: Instant) -> bool {
        let Some(timeout) = self.idle_timeout else {
            return false;
        };

        let expired = match &self.session {
            Session::Unlocked {
                cipher: EntryCipher::Aead(_),
                last_access,
            } => now.saturating_duration_since(*last_access) > timeout,
            _ => false,
        };
        if expired {
            self.session = Session::Locked;
        }
        expired
    }

    /// Cipher for a body access at `now`, refreshing the idle timer.
    ///
    /// # Errors
    ///
    /// `AccessDenied` if the gate is locked, including when the idle timeout
    /// lapsed before this access.
    pub fn cipher_at(&mut self, now: Instant) -> Result<&EntryCipher> {
        self.expire_idle_at(now);

        match &mut self.session {
            Session::Locked => Err(JournalError::AccessDenied),
            Session::Unlocked {
                cipher,
                last_access,
            } => {
                *last_access = now;
                Ok(cipher)
            }
        }
    }
}
