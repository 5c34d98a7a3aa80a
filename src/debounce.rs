//! Debouncing for the search input stream.
//!
//! Every scheduled value supersedes the one before it. Only the last value
//! scheduled within the window is ever delivered; intermediate values are
//! dropped, not queued.
//!
//! Two ways to drive it, depending on what the host event loop offers:
//!
//! - **Polling**: call [`Debouncer::poll`] with the current time (e.g. on
//!   every tick). It yields the pending value once its deadline has passed.
//! - **Timer callbacks**: arm a one-shot timer for [`Debouncer::deadline`]
//!   and pass the [`Ticket`] from [`Debouncer::schedule`] to
//!   [`Debouncer::fire`] when it goes off. A ticket from a superseded
//!   schedule is stale and fires nothing.
//!
//! Time is always passed in, so the debouncer never reads a clock itself.

use std::time::{Duration, Instant};

/// Default search debounce window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

/// Handle for one scheduled value. Valid until the next `schedule` or `cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value` for delivery at `now + window`, replacing anything
    /// already pending.
    pub fn schedule(&mut self, value: T, now: Instant) -> Ticket {
        self.generation += 1;
        self.pending = Some(Pending {
            value,
            due: now + self.window,
        });
        Ticket(self.generation)
    }

    /// Drop the pending value. Outstanding tickets become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes deliverable.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Whether `ticket` still refers to the pending value.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.pending.is_some() && ticket.0 == self.generation
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline()?;
        if now < due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Take the pending value if `ticket` is current, regardless of time.
    ///
    /// Meant for timer callbacks that already waited out the window.
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if !self.is_current(ticket) {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }
}

impl<T> Default for Debouncer<T> {
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
    fn default_window_is_300ms() {
        let d: Debouncer<String> = Debouncer::default();
        assert_eq!(d.window(), ms(300));
    }

    #[test]
    fn nothing_before_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        d.schedule("c", t0);
        assert_eq!(d.poll(t0 + ms(299)), None);
        assert!(d.is_pending());
    }

    #[test]
    fn delivers_at_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        d.schedule("c", t0);
        assert_eq!(d.deadline(), Some(t0 + ms(300)));
        assert_eq!(d.poll(t0 + ms(300)), Some("c"));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + ms(900)), None);
    }

    #[test]
    fn only_last_input_is_delivered() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        d.schedule("c", t0);
        d.schedule("cs", t0 + ms(100));
        d.schedule("css", t0 + ms(200));

        // The first deadline has passed, but it was superseded.
        assert_eq!(d.poll(t0 + ms(350)), None);
        assert_eq!(d.poll(t0 + ms(500)), Some("css"));
        assert_eq!(d.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn stale_ticket_fires_nothing() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        let first = d.schedule("c", t0);
        let second = d.schedule("cs", t0 + ms(50));

        assert!(!d.is_current(first));
        assert_eq!(d.fire(first), None);
        assert_eq!(d.fire(second), Some("cs"));
        assert_eq!(d.fire(second), None);
    }

    #[test]
    fn cancel_invalidates_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(300));
        let ticket = d.schedule("c", t0);
        d.cancel();

        assert!(!d.is_pending());
        assert_eq!(d.deadline(), None);
        assert_eq!(d.fire(ticket), None);
        assert_eq!(d.poll(t0 + ms(1000)), None);
    }
}
