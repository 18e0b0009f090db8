//! Cancel-and-reschedule debouncing for history updates.
//!
//! Polling-based rather than timer-thread-based: callers submit values as
//! they change and poll on their own cadence. Only the newest value survives
//! a quiet period, so rapid slider drags collapse into one history entry.

use std::time::{Duration, Instant};

pub struct Debounce<T> {
    delay: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    /// Stores `value` and restarts the quiet period, discarding any value
    /// that was still waiting.
    pub fn submit(&mut self, value: T) {
        self.pending = Some(value);
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Releases the pending value once the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Releases the pending value immediately, deadline or not. Used on
    /// teardown so the last edit is never lost.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_held_until_the_quiet_period_passes() {
        let mut debounce = Debounce::new(Duration::from_millis(500));
        debounce.submit(1);
        let submitted_at = Instant::now();

        assert_eq!(debounce.poll(submitted_at), None);
        assert!(debounce.is_pending());
        assert_eq!(debounce.poll(submitted_at + Duration::from_millis(600)), Some(1));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn resubmitting_replaces_the_value_and_restarts_the_clock() {
        let mut debounce = Debounce::new(Duration::from_millis(500));
        debounce.submit(1);
        debounce.submit(2);

        let now = Instant::now();
        assert_eq!(debounce.poll(now + Duration::from_secs(1)), Some(2));
        // Nothing left after release.
        assert_eq!(debounce.poll(now + Duration::from_secs(2)), None);
    }

    #[test]
    fn flush_releases_early() {
        let mut debounce = Debounce::new(Duration::from_secs(60));
        debounce.submit("draft");
        assert_eq!(debounce.flush(), Some("draft"));
        assert_eq!(debounce.flush(), None);
    }
}
