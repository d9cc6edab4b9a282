//! Per-field debounce state.
//!
//! A [`Debouncer`] is an explicit timer state object instead of a callback
//! closure: it holds the pending value together with its deadline, and every
//! edit is a state transition that replaces the value and reschedules the
//! deadline. The caller owns the clock and passes `now` in, so the same state
//! machine is driven by the session task in production and by plain
//! `Instant` arithmetic in tests.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
    first_edit: Instant,
}

/// Debounce state for one field.
///
/// - Only the most recent pushed value is ever released; earlier values are
///   superseded, never queued.
/// - The deadline is `quiet` after the latest push, capped at `max_wait`
///   after the first push of the current burst when a max wait is set.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    max_wait: Option<Duration>,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// A debouncer that fires after `quiet` of inactivity.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            max_wait: None,
            pending: None,
        }
    }

    /// A debouncer that also fires no later than `max_wait` after the first
    /// unreleased edit, even while edits keep arriving.
    pub fn with_max_wait(quiet: Duration, max_wait: Duration) -> Self {
        Self {
            quiet,
            max_wait: Some(max_wait),
            pending: None,
        }
    }

    /// Record an edit at `now`, replacing any pending value.
    pub fn push(&mut self, value: T, now: Instant) {
        let first_edit = self.pending.as_ref().map_or(now, |p| p.first_edit);
        let mut deadline = now + self.quiet;
        if let Some(max_wait) = self.max_wait {
            deadline = deadline.min(first_edit + max_wait);
        }
        self.pending = Some(Pending {
            value,
            deadline,
            first_edit,
        });
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The waiting value without releasing it.
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
