//! Failed-attempt tracking.
//!
//! After too many consecutive wrong passwords further attempts are refused
//! for a fixed window without running the KDF. The counter and deadline are
//! wall-clock based so the guard can save them through the store and restore
//! them in the next session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{JournalError, Result};
use crate::storage::LockoutState;

#[derive(Debug)]
pub struct AttemptTracker {
    max_failed: u32,
    window: Duration,
    failed: u32,
    locked_until: Option<DateTime<Utc>>,
}

impl AttemptTracker {
    /// `max_failed == 0` disables lockout.
    pub fn new(max_failed: u32, window: Duration) -> Self {
        Self {
            max_failed,
            window,
            failed: 0,
            locked_until: None,
        }
    }

    /// Pick up where a previous session left off.
    ///
    /// A saved deadline further out than one window from `now` (clock moved
    /// back, or a shorter window configured since) is pulled in to
    /// `now + window`.
    pub fn restore(mut self, saved: LockoutState, now: DateTime<Utc>) -> Self {
        self.failed = saved.failed_attempts;
        self.locked_until = saved
            .locked_until
            .map(|until| until.min(self.deadline_from(now)));
        self
    }

    /// State worth saving, `None` when there is nothing to carry over.
    pub fn state(&self) -> Option<LockoutState> {
        (self.failed > 0 || self.locked_until.is_some()).then_some(LockoutState {
            failed_attempts: self.failed,
            locked_until: self.locked_until,
        })
    }

    /// Refuse the attempt if a lockout is active at `now`. An expired lockout
    /// is cleared.
    pub fn check_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        if let Some(until) = self.locked_until {
            if now < until {
                return Err(JournalError::LockedOut {
                    retry_after: (until - now).to_std().unwrap_or_default(),
                });
            }
            self.reset();
        }
        Ok(())
    }

    pub fn record_failure_at(&mut self, now: DateTime<Utc>) {
        self.failed = self.failed.saturating_add(1);
        if self.max_failed > 0 && self.failed >= self.max_failed {
            self.locked_until = Some(self.deadline_from(now));
            warn!(
                failed_attempts = self.failed,
                lockout_secs = self.window.as_secs(),
                "unlock locked out"
            );
        }
    }

    pub fn reset(&mut self) {
        self.failed = 0;
        self.locked_until = None;
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed
    }

    /// Attempts left before lockout, `None` when lockout is disabled.
    pub fn remaining_attempts(&self) -> Option<u32> {
        (self.max_failed > 0).then(|| self.max_failed.saturating_sub(self.failed))
    }

    fn deadline_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.window)
            .ok()
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
