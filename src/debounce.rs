//! Debounce timer
//!
//! Collapses a high-frequency event source (editor keystrokes) into
//! one trailing action. At most one deadline is pending at a time;
//! every new change replaces it. The timer itself is a pure state
//! machine over injected instants, so its behavior is testable without
//! sleeping; the async driver lives in the session module.

use std::time::{Duration, Instant};

/// A delay-and-coalesce timer
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change, restarting the quiet period
    pub fn record_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// The pending deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a fire is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the quiet period has elapsed
    ///
    /// Returns true at most once per recorded change burst; firing
    /// clears the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
