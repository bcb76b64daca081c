//! Monotonic time base shared by the timer subsystem and its drivers.
//!
//! [`Instant`] counts microseconds since boot, the same unit the ESP-IDF
//! high-resolution timer reports. The timer core never reads a clock
//! itself; callers pass `now` in, so tests drive it with a
//! [`ManualClock`] and the firmware with
//! [`MonotonicClock`](crate::adapters::time::MonotonicClock).

use core::fmt;
use core::ops::Add;
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::ports::TimePort;

/// A point on the monotonic timeline, microseconds since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant(u64);

impl Instant {
    pub const BOOT: Instant = Instant(0);

    pub const fn from_micros(us: u64) -> Self {
        Self(us)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    pub fn saturating_duration_since(self, earlier: Instant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

// ── Simulated clock ───────────────────────────────────────────

/// Hand-advanced clock for simulation and tests.
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) -> Instant {
        let us = by.as_micros() as u64;
        Instant(self.now_us.fetch_add(us, Ordering::AcqRel) + us)
    }

    pub fn set(&self, to: Instant) {
        self.now_us.store(to.0, Ordering::Release);
    }
}

impl TimePort for ManualClock {
    fn now(&self) -> Instant {
        Instant(self.now_us.load(Ordering::Acquire))
    }
}
