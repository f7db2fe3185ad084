#![forbid(unsafe_code)]

//! Fixed-period deadline scheduling.
//!
//! [`Interval`] is polled by the host with the current monotonic time. It
//! never spawns a thread and never fires twice for one poll: a host that
//! stalls for several periods gets one tick, and the next deadline is
//! re-anchored one period after the poll. Ticks are delayed, not burst.

use std::time::Duration;

/// A cancellable fixed-period deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next_due: Option<Duration>,
    fired: u64,
}

impl Interval {
    /// Start an interval whose first deadline is one period after `now`.
    pub fn start(period: Duration, now: Duration) -> Self {
        Self {
            period,
            next_due: Some(now.saturating_add(period)),
            fired: 0,
        }
    }

    /// Period between deadlines.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the interval is still scheduled.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Next deadline, if active.
    #[inline]
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Number of times the interval has fired.
    #[inline]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Fire if the deadline has passed. Returns `true` at most once per call.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due.saturating_add(self.period);
        if next <= now {
            next = now.saturating_add(self.period);
        }
        self.next_due = Some(next);
        self.fired = self.fired.saturating_add(1);
        true
    }

    /// Time left before the next deadline. `None` once cancelled.
    pub fn time_until_due(&self, now: Duration) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_sub(now))
    }

    /// Stop the interval. Idempotent.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(33);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_deadline_is_one_period_out() {
        let mut iv = Interval::start(P, ms(100));
        assert_eq!(iv.next_due(), Some(ms(133)));
        assert!(!iv.poll(ms(132)));
        assert!(iv.poll(ms(133)));
        assert_eq!(iv.next_due(), Some(ms(166)));
    }

    #[test]
    fn fires_once_per_poll() {
        let mut iv = Interval::start(P, Duration::ZERO);
        assert!(iv.poll(ms(40)));
        assert!(!iv.poll(ms(40)));
        assert_eq!(iv.fired(), 1);
    }

    #[test]
    fn keeps_cadence_when_slightly_late() {
        let mut iv = Interval::start(P, Duration::ZERO);
        assert!(iv.poll(ms(40)));
        assert_eq!(iv.next_due(), Some(ms(66)));
    }

    #[test]
    fn reanchors_after_stall() {
        let mut iv = Interval::start(P, Duration::ZERO);
        assert!(iv.poll(ms(500)));
        assert_eq!(iv.next_due(), Some(ms(533)));
        assert!(!iv.poll(ms(532)));
    }

    #[test]
    fn cancel_stops_firing() {
        let mut iv = Interval::start(P, Duration::ZERO);
        iv.cancel();
        iv.cancel();
        assert!(!iv.is_active());
        assert!(!iv.poll(ms(10_000)));
        assert_eq!(iv.time_until_due(ms(0)), None);
    }

    #[test]
    fn time_until_due_saturates() {
        let iv = Interval::start(P, Duration::ZERO);
        assert_eq!(iv.time_until_due(ms(10)), Some(ms(23)));
        assert_eq!(iv.time_until_due(ms(99)), Some(Duration::ZERO));
    }
}
