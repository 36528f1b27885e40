//! Trailing debounce for rapid settings edits.
//!
//! Coalesces a burst of values into the last one, released once the delay
//! has elapsed. Time arrives as an explicit `Instant` so the utility stays
//! synchronous and deterministic; the host drives `poll` from its event
//! loop.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    /// Replace the pending value and restart the delay window.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// Release the pending value if the delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Release the pending value immediately, e.g. on focus loss.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
