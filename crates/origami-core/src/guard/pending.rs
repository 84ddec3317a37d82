//! Background password derivation.
//!
//! Argon2id takes long enough that an interactive caller should not block on
//! it. `begin_unlock` hands the work to a worker thread and returns a
//! [`PendingUnlock`]; the caller polls or waits for an [`UnlockOutcome`] and
//! passes it back to `finish_unlock` on its own thread. The gate is only ever
//! touched on that thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};

use crate::crypto::{verify_password, EntryKey};
use crate::error::{JournalError, Result};
use crate::storage::PasswordRecord;

/// Result of a background derivation, ready to hand back to the guard.
pub struct UnlockOutcome {
    pub(crate) record: PasswordRecord,
    pub(crate) result: Result<EntryKey>,
}

impl UnlockOutcome {
    /// Whether the password matched the record it was checked against.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl std::fmt::Debug for UnlockOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockOutcome")
            .field("success", &self.is_success())
            .finish_non_exhaustive()
    }
}

/// Handle to an in-flight derivation. Dropping it discards the result.
pub struct PendingUnlock {
    record: PasswordRecord,
    receiver: Receiver<Result<EntryKey>>,
    started_at: Instant,
}

impl PendingUnlock {
    pub(crate) fn spawn(record: PasswordRecord, password: SecretString) -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker_record = record.clone();

        thread::Builder::new()
            .name("origami-unlock".to_string())
            .spawn(move || {
                let result = verify_password(
                    password.expose_secret(),
                    &worker_record.salt,
                    &worker_record.kdf,
                    &worker_record.verifier,
                );
                // receiver gone means the caller gave up
                let _ = sender.send(result);
            })
            .map_err(|e| JournalError::Crypto(format!("Failed to start unlock worker: {}", e)))?;

        Ok(Self {
            record,
            receiver,
            started_at: Instant::now(),
        })
    }

    /// Time since the derivation started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Poll without blocking. Returns `None` while the worker is still running.
    pub fn try_result(&self) -> Option<UnlockOutcome> {
        match self.receiver.try_recv() {
            Ok(result) => Some(self.outcome(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.outcome(Err(Self::worker_gone()))),
        }
    }

    /// Block for at most `timeout`. Suited to spinner loops.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<UnlockOutcome> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(self.outcome(result)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(self.outcome(Err(Self::worker_gone()))),
        }
    }

    /// Block until the derivation finishes.
    pub fn wait(self) -> UnlockOutcome {
        let result = self
            .receiver
            .recv()
            .unwrap_or_else(|_| Err(Self::worker_gone()));
        UnlockOutcome {
            record: self.record,
            result,
        }
    }

    fn outcome(&self, result: Result<EntryKey>) -> UnlockOutcome {
        UnlockOutcome {
            record: self.record.clone(),
            result,
        }
    }

    fn worker_gone() -> JournalError {
        JournalError::Crypto("Unlock worker exited without a result".to_string())
    }
}

impl std::fmt::Debug for PendingUnlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingUnlock")
            .field("elapsed", &self.elapsed())
            .finish_non_exhaustive()
    }
}
