//! Embassy time driver for ESP-IDF.
//!
//! `async-io-mini` timers (the timer context sleeps on them) read time and
//! schedule wakeups through the embassy time-driver hooks. On the board
//! those hooks are provided here, backed by `esp_timer_get_time()` and one
//! wake thread. Host builds get the driver from `embassy-time`'s `std`
//! feature instead.
//!
//! Ticks are microseconds (the embassy default of 1 MHz), the same unit as
//! `esp_timer_get_time()` and [`Instant`](crate::time::Instant).

use core::task::Waker;
use core::time::Duration;
use std::sync::{Condvar, Mutex, MutexGuard, Once, PoisonError};

use log::error;

struct Wake {
    at: u64,
    waker: Waker,
}

struct EspTimeDriver {
    queue: Mutex<Vec<Wake>>,
    changed: Condvar,
    started: Once,
}

embassy_time_driver::time_driver_impl!(static DRIVER: EspTimeDriver = EspTimeDriver {
    queue: Mutex::new(Vec::new()),
    changed: Condvar::new(),
    started: Once::new(),
});

impl EspTimeDriver {
    fn lock(&self) -> MutexGuard<'_, Vec<Wake>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep until the earliest registered wake, fire everything due, repeat.
    fn wake_loop(&'static self) {
        let mut queue = self.lock();
        loop {
            let now = embassy_time_driver::Driver::now(self);
            queue.retain(|w| {
                if w.at <= now {
                    w.waker.wake_by_ref();
                    false
                } else {
                    true
                }
            });

            queue = match queue.iter().map(|w| w.at).min() {
                Some(at) => {
                    let wait = Duration::from_micros(at - now);
                    self.changed
                        .wait_timeout(queue, wait)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .changed
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

impl embassy_time_driver::Driver for EspTimeDriver {
    fn now(&self) -> u64 {
        // SAFETY: esp_timer is running before main(); the call has no
        // other preconditions.
        unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        self.started.call_once(|| {
            let spawned = std::thread::Builder::new()
                .name("time-wake".into())
                .stack_size(4 * 1024)
                .spawn(|| DRIVER.wake_loop());
            if let Err(e) = spawned {
                error!("time driver: wake thread not started: {}", e);
            }
        });

        let mut queue = self.lock();
        match queue.iter_mut().find(|w| w.waker.will_wake(waker)) {
            Some(w) => w.at = w.at.min(at),
            None => queue.push(Wake {
                at,
                waker: waker.clone(),
            }),
        }
        self.changed.notify_one();
    }
}
