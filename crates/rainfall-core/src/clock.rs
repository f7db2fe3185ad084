#![forbid(unsafe_code)]

//! Monotonic clocks.
//!
//! Time is expressed as a [`Duration`] since an arbitrary origin. The render
//! loop only ever compares and adds these values, so a host can drive it from
//! the wall clock ([`MonotonicClock`]) or step it explicitly
//! ([`DeterministicClock`]) in tests and headless runs.

use core::time::Duration;

use web_time::Instant;

/// Source of monotonic time.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now_mono(&self) -> Duration;
}

/// Wall-clock backed monotonic time, anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic monotonic clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}
