//! Debounced restart scheduling
//!
//! Collapses a burst of restart requests into a single delayed action. The
//! scheduler owns the one pending-restart slot as an `Option<Instant>`
//! deadline: re-arming replaces the deadline, so a superseded request can
//! never fire. The owning watch-loop thread is the only caller, which keeps
//! cancel-then-arm serialized without locks.

use std::time::{Duration, Instant};

/// Default quiet period in milliseconds
pub const QUIET_PERIOD_MS: u64 = 1000;

/// Coalesces restart requests into at most one pending restart
#[derive(Debug)]
pub struct DebounceScheduler {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Record intent to restart.
    ///
    /// Cancels any pending deadline and arms a new one `quiet_period` from
    /// now. Returns immediately; the action runs later, when the owning loop
    /// observes `take_due`.
    pub fn request(&mut self) {
        self.deadline = Some(Instant::now() + self.quiet_period);
    }

    /// Drop the pending restart, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a restart is armed (fired or not)
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the quiet period has elapsed with no further request
    pub fn is_due(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// Consume the pending restart if it is due.
    ///
    /// Clears the slot, so each armed restart fires at most once. A request
    /// arriving while the caller is mid-restart simply arms the next
    /// deadline; it never aborts the restart in progress.
    pub fn take_due(&mut self) -> bool {
        if self.is_due() {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
