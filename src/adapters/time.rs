//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side runs.

use crate::app::ports::TimePort;
use crate::time::Instant;

/// Wall-clock-free monotonic time since boot.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl TimePort for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Instant {
        // SAFETY: esp_timer_get_time has no preconditions once the system
        // timer is running, which it is before main().
        Instant::from_micros(unsafe { esp_idf_svc::sys::esp_timer_get_time() } as u64)
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Instant {
        Instant::from_micros(self.start.elapsed().as_micros() as u64)
    }
}
