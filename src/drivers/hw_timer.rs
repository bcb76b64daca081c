//! Timer context.
//!
//! A dedicated high-priority thread owns the [`TimerSubsystem`] and runs
//! its callbacks. It sleeps on an `async-io-mini` reactor timer until the
//! earliest armed deadline, expires everything due, and sleeps again.
//! With nothing armed it parks forever.
//!
//! ```text
//!  tick-timer thread
//!  ┌──────────────────────────────────────────────┐
//!  │  now = clock.now()                           │
//!  │  timers.expire(now)  ──▶ callbacks run here  │
//!  │  Timer::after(next_deadline - now).await     │
//!  └──────────────────────────────────────────────┘
//! ```
//!
//! Callbacks run on this thread, so they must be short and must not
//! block. The deferred route only submits a work item from here.

use core::time::Duration;
use std::io;
use std::thread::JoinHandle;

use log::{debug, info};

use crate::app::ports::TimePort;
use crate::timer::TimerSubsystem;

use super::task_pin::{self, TIMER_TASK};

/// Drive `timers` against `clock` forever.
pub async fn run<C: TimePort>(mut timers: TimerSubsystem, clock: C) {
    info!("Timer context started ({} timers)", timers.len());
    loop {
        let fired = timers.expire(clock.now());
        if fired > 0 {
            debug!("Timer: {} fired", fired);
        }

        match timers.next_deadline() {
            Some(deadline) => {
                let wait: Duration = deadline.saturating_duration_since(clock.now());
                async_io_mini::Timer::after(wait).await;
            }
            None => {
                info!("Timer: nothing armed, idling");
                core::future::pending::<()>().await;
            }
        }
    }
}

/// Spawn the timer context on APP_CPU at the highest task priority.
pub fn spawn<C>(timers: TimerSubsystem, clock: C) -> io::Result<JoinHandle<()>>
where
    C: TimePort + Send + 'static,
{
    task_pin::spawn(TIMER_TASK, move || {
        futures_lite::future::block_on(run(timers, clock));
    })
}
