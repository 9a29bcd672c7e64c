//! Debounced save scheduling
//!
//! Rapid budget edits (typing an income, dragging a slider) are coalesced
//! into one pending write. Every edit restarts the quiet period; the write
//! fires once the deadline passes or when the caller flushes. Time is always
//! passed in, which keeps the contract testable without sleeping.

use std::time::{Duration, Instant};

/// A write waiting for its quiet period to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSave {
    /// When the first coalesced edit arrived
    pub first_edit: Instant,
    /// When the write becomes due
    pub deadline: Instant,
    /// Number of edits folded into this write
    pub edits: u32,
}

/// Coalesces edits into a single delayed write
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    delay: Duration,
    pending: Option<PendingSave>,
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an edit at `now`, restarting the quiet period
    ///
    /// Returns the new deadline.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.pending = Some(match self.pending {
            Some(p) => PendingSave {
                first_edit: p.first_edit,
                deadline,
                edits: p.edits + 1,
            },
            None => PendingSave {
                first_edit: now,
                deadline,
                edits: 1,
            },
        });
        deadline
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.pending.map(|p| now >= p.deadline).unwrap_or(false)
    }

    /// Take the pending write if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<PendingSave> {
        if self.is_due(now) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Take the pending write regardless of its deadline
    pub fn flush(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    /// Drop the pending write; returns whether one existed
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
