//! Debouncing against an external clock.
//!
//! Every trigger pushes the deadline to `now + window`, but never past
//! `first + max_wait`, where `first` is the trigger that opened the burst. A
//! steady stream of triggers therefore still fires at least once per
//! `max_wait`. `max_wait` defaults to the window.

use std::time::Duration;

/// Default debounce window for reconciliation passes.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    max_wait: Duration,
    first: Option<Duration>,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            max_wait: window,
            first: None,
            deadline: None,
        }
    }

    /// Longest delay between the first trigger of a burst and firing.
    /// Values below the window are raised to it.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait.max(self.window);
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// (Re)arms the timer.
    pub fn trigger(&mut self, now: Duration) {
        let first = *self.first.get_or_insert(now);
        self.deadline = Some((now + self.window).min(first + self.max_wait));
    }

    /// Returns true, and disarms, if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.first = None;
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_window() {
        let mut d = Debouncer::default();
        d.trigger(ms(0));
        assert!(!d.fire_if_due(ms(99)));
        assert!(d.fire_if_due(ms(100)));
        assert!(!d.fire_if_due(ms(500)));
    }

    #[test]
    fn test_trigger_resets_deadline_up_to_max_wait() {
        let mut d = Debouncer::new(ms(50)).with_max_wait(ms(120));
        d.trigger(ms(0));
        d.trigger(ms(40));
        assert!(!d.fire_if_due(ms(60)));
        assert!(d.fire_if_due(ms(90)));

        d.trigger(ms(100));
        d.trigger(ms(140));
        d.trigger(ms(180));
        assert_eq!(d.deadline(), Some(ms(220)));
        d.trigger(ms(210));
        assert_eq!(d.deadline(), Some(ms(220)));
        assert!(d.fire_if_due(ms(220)));
    }

    #[test]
    fn test_steady_stream_still_fires() {
        let mut d = Debouncer::default();
        let mut fired = Vec::new();
        for tick in 0..40u64 {
            let now = ms(tick * 60);
            if d.fire_if_due(now) {
                fired.push(now);
            }
            d.trigger(now);
        }
        assert!(fired.len() >= 15, "fired {} times", fired.len());
        assert_eq!(fired[0], ms(120));
    }

    #[test]
    fn test_max_wait_never_below_window() {
        let d = Debouncer::new(ms(100)).with_max_wait(ms(10));
        assert_eq!(d.max_wait(), ms(100));
    }

    #[test]
    fn test_cancel() {
        let mut d = Debouncer::default();
        d.trigger(ms(0));
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.fire_if_due(ms(1000)));
    }
}
