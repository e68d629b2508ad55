//! Quiet-period scheduling for Typeahead.
//!
//! Provides [`Debouncer`], a single-slot one-shot scheduler that delays a
//! payload until no new payload has been scheduled for a fixed quiet period,
//! and [`Throttle`], its leading-edge counterpart.
//!
//! Both are purely time-driven and poll-based: the owner passes an explicit
//! `Instant` into [`Debouncer::poll`] from its event loop, which keeps the
//! types deterministic under test and free of background threads. Each
//! logical debounce gets its own instance; the pending slot is an owned,
//! cancellable handle, never shared.

use std::time::{Duration, Instant};

/// A pending one-shot fire.
#[derive(Debug)]
struct Pending<T> {
    /// When the payload should fire.
    deadline: Instant,
    /// The payload delivered on fire.
    payload: T,
}

/// Delays a payload until a quiet period has elapsed since the last schedule.
///
/// `schedule` arms (or re-arms) the single pending slot; a previously armed,
/// not-yet-fired payload is dropped, so a burst of schedules spaced closer
/// together than the quiet period yields exactly one fire — the last
/// payload, one quiet period after the last schedule.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use typeahead_core::Debouncer;
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(300));
/// let t0 = Instant::now();
///
/// debouncer.schedule("ch", t0);
/// debouncer.schedule("chi", t0 + Duration::from_millis(100));
///
/// assert_eq!(debouncer.poll(t0 + Duration::from_millis(300)), None);
/// assert_eq!(debouncer.poll(t0 + Duration::from_millis(400)), Some("chi"));
/// ```
#[derive(Debug)]
pub struct Debouncer<T> {
    /// The quiet interval between the last schedule and the fire.
    quiet: Duration,
    /// The armed slot, if any.
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    ///
    /// Construction has no side effects; nothing is armed.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Arm the slot with `payload`, firing at `now + quiet`.
    ///
    /// Any previously armed, not-yet-fired payload is cancelled and dropped.
    pub fn schedule(&mut self, payload: T, now: Instant) {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            deadline: now + self.quiet,
            payload,
        });
        tracing::trace!(
            target: "typeahead_core::timer",
            superseded,
            quiet_ms = self.quiet.as_millis() as u64,
            "debounce scheduled"
        );
    }

    /// Void the pending payload without firing it.
    ///
    /// Returns `true` if a payload was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.pending.take().is_some();
        if was_pending {
            tracing::trace!(target: "typeahead_core::timer", "debounce cancelled");
        }
        was_pending
    }

    /// Whether a payload is armed and waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The fire time of the pending payload, if any.
    ///
    /// Lets an embedding event loop sleep until exactly the next deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Time remaining until the pending payload fires.
    ///
    /// Returns `Duration::ZERO` for an already-due payload and `None` when
    /// nothing is pending.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fire the pending payload if its deadline has passed.
    ///
    /// Returns the payload at most once; later polls return `None` until the
    /// next `schedule`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                tracing::trace!(target: "typeahead_core::timer", "debounce fired");
                self.pending.take().map(|p| p.payload)
            }
            _ => None,
        }
    }
}

/// Leading-edge rate limiter: lets at most one call through per interval.
///
/// The first [`allow`](Self::allow) passes; subsequent calls within the
/// interval are rejected until it has fully elapsed.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_pass: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given minimum interval between passes.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_pass: None,
        }
    }

    /// Whether a call at `now` may proceed; records the pass if so.
    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last_pass {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_pass = Some(now);
                true
            }
        }
    }

    /// Forget the last pass so the next call goes through.
    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_coalesces_to_last_payload() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("a", t0);
        debouncer.schedule("ab", t0 + ms(100));
        debouncer.schedule("abc", t0 + ms(200));

        // Quiet period restarts at each schedule: nothing due at t0 + 450.
        assert_eq!(debouncer.poll(t0 + ms(450)), None);

        // Exactly one fire, last payload, W after the last schedule.
        assert_eq!(debouncer.poll(t0 + ms(500)), Some("abc"));
        assert_eq!(debouncer.poll(t0 + ms(600)), None);
    }

    #[test]
    fn fires_exactly_at_deadline() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule(1, t0);
        assert_eq!(debouncer.deadline(), Some(t0 + QUIET));
        assert_eq!(debouncer.poll(t0 + QUIET), Some(1));
    }

    #[test]
    fn cancel_voids_pending() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("x", t0);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn time_until_fire_saturates() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        assert_eq!(debouncer.time_until_fire(t0), None);
        debouncer.schedule((), t0);
        assert_eq!(debouncer.time_until_fire(t0 + ms(100)), Some(ms(200)));
        assert_eq!(debouncer.time_until_fire(t0 + ms(400)), Some(ms(0)));
    }

    #[test]
    fn reschedule_after_fire_rearms() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("first", t0);
        assert_eq!(debouncer.poll(t0 + QUIET), Some("first"));

        debouncer.schedule("second", t0 + ms(500));
        assert_eq!(debouncer.poll(t0 + ms(700)), None);
        assert_eq!(debouncer.poll(t0 + ms(800)), Some("second"));
    }

    #[test]
    fn throttle_passes_leading_edge() {
        let mut throttle = Throttle::new(ms(100));
        let t0 = Instant::now();

        assert!(throttle.allow(t0));
        assert!(!throttle.allow(t0 + ms(50)));
        assert!(throttle.allow(t0 + ms(150)));
    }

    #[test]
    fn throttle_reset_forgets_last_pass() {
        let mut throttle = Throttle::new(ms(100));
        let t0 = Instant::now();

        assert!(throttle.allow(t0));
        throttle.reset();
        assert!(throttle.allow(t0 + ms(10)));
    }
}
