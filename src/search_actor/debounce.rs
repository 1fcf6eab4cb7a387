use std::time::Duration;

use tokio::time::Instant;

/// Holds back a changing value until it has been stable for the quiescence
/// window.
///
/// Time is passed in by the caller, so the owner decides how to wait for
/// [`Debouncer::deadline`].
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    published: T,
    pending: Option<(T, Instant)>,
    window: Duration,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// The initial value is published immediately.
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            published: initial,
            pending: None,
            window,
        }
    }

    pub fn published(&self) -> &T {
        &self.published
    }

    /// When the pending value becomes due, if one is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Record a new input. Any earlier pending value is dropped and the
    /// timer restarts from `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        let latest = match &self.pending {
            Some((pending, _)) => pending,
            None => &self.published,
        };
        if *latest == value {
            return;
        }
        if value == self.published {
            // Typed back to what is already shown; nothing left to publish.
            self.pending = None;
            return;
        }
        self.pending = Some((value, now + self.window));
    }

    /// Change the window. A pending value is rescheduled with the new window
    /// starting from `now`.
    pub fn set_window(&mut self, window: Duration, now: Instant) {
        self.window = window;
        if let Some((_, due)) = &mut self.pending {
            *due = now + window;
        }
    }

    /// Publish the pending value if its deadline has passed. Returns the newly
    /// published value, once.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        match &self.pending {
            Some((_, due)) if *due <= now => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        self.published = value;
        Some(&self.published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_value_is_published_immediately() {
        let debouncer = Debouncer::new("test", WINDOW);
        assert_eq!(*debouncer.published(), "test");
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_value_waits_for_full_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("test", WINDOW);
        debouncer.push("updated", start);

        assert_eq!(debouncer.poll(start + ms(100)), None);
        assert_eq!(debouncer.poll(start + ms(299)), None);
        assert_eq!(*debouncer.published(), "test");

        assert_eq!(debouncer.poll(start + ms(300)), Some(&"updated"));
        assert_eq!(*debouncer.published(), "updated");
    }

    #[test]
    fn test_rapid_updates_collapse_to_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), WINDOW);

        for (offset, text) in [(0, "d"), (50, "do"), (120, "doe"), (250, "doe,")].iter() {
            debouncer.push(text.to_string(), start + ms(*offset));
            assert_eq!(debouncer.poll(start + ms(*offset)), None);
        }

        assert_eq!(debouncer.poll(start + ms(549)), None);
        assert_eq!(debouncer.poll(start + ms(550)).map(String::as_str), Some("doe,"));
        // Exactly once.
        assert_eq!(debouncer.poll(start + ms(5_000)), None);
    }

    #[test]
    fn test_new_window_applies_to_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("test", WINDOW);
        debouncer.push("updated", start);
        debouncer.set_window(ms(100), start);

        assert_eq!(debouncer.poll(start + ms(100)), Some(&"updated"));
    }

    #[test]
    fn test_reverting_to_published_value_cancels_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("a", WINDOW);
        debouncer.push("ab", start);
        debouncer.push("a", start + ms(10));

        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(start + ms(1_000)), None);
    }

    #[test]
    fn test_repeating_pending_value_does_not_restart_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("a", WINDOW);
        debouncer.push("ab", start);
        debouncer.push("ab", start + ms(200));

        assert_eq!(debouncer.deadline(), Some(start + WINDOW));
    }
}
