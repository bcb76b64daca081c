//! Timer subsystem.
//!
//! A fixed table of independently armed timers, each with an initial delay
//! and an optional repeat period. The table never reads a clock: the timer
//! context ([`drivers::hw_timer`](crate::drivers::hw_timer)) passes `now`
//! into [`TimerSubsystem::expire`] and sleeps until
//! [`TimerSubsystem::next_deadline`]. Tests do the same with simulated time.
//!
//! ```text
//!  start(delay, period) ──▶ Armed { deadline } ──expire(now ≥ deadline)──▶ callback
//!                              ▲        │
//!                              │        ├─ period:  deadline += period (phase kept)
//!                              │        └─ one-shot: Stopped
//!                              └─ stop() ──▶ Stopped (+ stop callback)
//! ```
//!
//! Repeats are measured from the *scheduled* deadline, never from when the
//! callback actually ran, so callback jitter does not accumulate. When the
//! timer context wakes more than a full period late, the missed fires are
//! dropped and counted as overruns; the callback still runs only once per
//! pass and never concurrently with itself (the table is `&mut` while it
//! dispatches).

use core::time::Duration;

use heapless::Vec;
use log::{info, trace, warn};

use crate::error::{Error, Result};
use crate::time::Instant;

/// Maximum number of timers (stack-allocated table).
pub const MAX_TIMERS: usize = 4;

/// Expiry or stop function.
///
/// Runs in the timer callback context: it must return promptly and must
/// never block. Anything heavier belongs in a work item.
pub type TimerFn = Box<dyn FnMut() + Send>;

/// Handle to a timer slot, returned by [`TimerSubsystem::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Stopped,
    Armed {
        deadline: Instant,
        /// Repeat period in microseconds; `None` for one-shot.
        period_us: Option<u64>,
    },
}

struct Timer {
    name: &'static str,
    expiry: TimerFn,
    on_stop: Option<TimerFn>,
    state: TimerState,
    fires: u64,
    overruns: u64,
}

/// The timer table.
pub struct TimerSubsystem {
    timers: Vec<Timer, MAX_TIMERS>,
}

impl Default for TimerSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerSubsystem {
    pub const fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Register a timer. It stays stopped until [`start`](Self::start).
    pub fn create(
        &mut self,
        name: &'static str,
        expiry: TimerFn,
        on_stop: Option<TimerFn>,
    ) -> Result<TimerHandle> {
        let slot = self.timers.len();
        self.timers
            .push(Timer {
                name,
                expiry,
                on_stop,
                state: TimerState::Stopped,
                fires: 0,
                overruns: 0,
            })
            .map_err(|_| Error::TimerTableFull)?;
        info!("Timer: created '{}' at slot {}", name, slot);
        Ok(TimerHandle(slot as u8))
    }

    /// Arm `handle` to fire at `now + initial_delay`, then every `period`.
    ///
    /// `None` or a zero period means one-shot. Starting a running timer
    /// re-arms it from `now`. A period too long for the microsecond
    /// timeline is rejected and leaves the timer as it was.
    pub fn start(
        &mut self,
        handle: TimerHandle,
        now: Instant,
        initial_delay: Duration,
        period: Option<Duration>,
    ) -> Result<()> {
        let timer = self.slot_mut(handle)?;
        let period_us = match period.filter(|p| p.as_micros() > 0) {
            Some(p) => Some(u64::try_from(p.as_micros()).map_err(|_| Error::PeriodOutOfRange)?),
            None => None,
        };
        let deadline = now + initial_delay;
        timer.state = TimerState::Armed { deadline, period_us };
        match period_us {
            Some(p) => info!(
                "Timer: '{}' armed, first fire at {} then every {:?}",
                timer.name,
                deadline,
                Duration::from_micros(p)
            ),
            None => info!("Timer: '{}' armed one-shot at {}", timer.name, deadline),
        }
        Ok(())
    }

    /// Cancel pending and future fires. No-op on a stopped timer.
    ///
    /// Work already submitted by an earlier fire is not affected.
    pub fn stop(&mut self, handle: TimerHandle) -> Result<()> {
        let timer = self.slot_mut(handle)?;
        if timer.state == TimerState::Stopped {
            return Ok(());
        }
        timer.state = TimerState::Stopped;
        info!("Timer: '{}' stopped after {} fires", timer.name, timer.fires);
        if let Some(on_stop) = timer.on_stop.as_mut() {
            on_stop();
        }
        Ok(())
    }

    /// Fire every timer whose deadline is at or before `now`, earliest
    /// deadline first. Each timer fires at most once per call.
    ///
    /// Returns the number of callbacks invoked.
    pub fn expire(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(slot) = self.earliest_due(now) {
            self.fire(slot, now);
            fired += 1;
        }
        fired
    }

    /// Earliest deadline across all armed timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .iter()
            .filter_map(|t| match t.state {
                TimerState::Armed { deadline, .. } => Some(deadline),
                TimerState::Stopped => None,
            })
            .min()
    }

    /// Time left until `handle` next fires, `None` if stopped.
    pub fn remaining(&self, handle: TimerHandle, now: Instant) -> Option<Duration> {
        match self.slot(handle).ok()?.state {
            TimerState::Armed { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            TimerState::Stopped => None,
        }
    }

    pub fn is_running(&self, handle: TimerHandle) -> bool {
        self.slot(handle)
            .is_ok_and(|t| matches!(t.state, TimerState::Armed { .. }))
    }

    pub fn fire_count(&self, handle: TimerHandle) -> u64 {
        self.slot(handle).map_or(0, |t| t.fires)
    }

    /// Periodic fires dropped because the timer context woke too late.
    pub fn overruns(&self, handle: TimerHandle) -> u64 {
        self.slot(handle).map_or(0, |t| t.overruns)
    }

    pub fn name(&self, handle: TimerHandle) -> Option<&'static str> {
        self.slot(handle).ok().map(|t| t.name)
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    // ── Internal ──────────────────────────────────────────────

    fn slot(&self, handle: TimerHandle) -> Result<&Timer> {
        self.timers.get(handle.0 as usize).ok_or(Error::UnknownTimer)
    }

    fn slot_mut(&mut self, handle: TimerHandle) -> Result<&mut Timer> {
        self.timers
            .get_mut(handle.0 as usize)
            .ok_or(Error::UnknownTimer)
    }

    fn earliest_due(&self, now: Instant) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter_map(|(slot, t)| match t.state {
                TimerState::Armed { deadline, .. } if deadline <= now => Some((deadline, slot)),
                _ => None,
            })
            .min()
            .map(|(_, slot)| slot)
    }

    /// Re-arm (or stop) the timer in `slot`, then run its callback.
    fn fire(&mut self, slot: usize, now: Instant) {
        let timer = &mut self.timers[slot];
        let TimerState::Armed { deadline, period_us } = timer.state else {
            return;
        };

        timer.state = match period_us {
            Some(period_us) => {
                let late_us = now.as_micros() - deadline.as_micros();
                let missed = late_us / period_us;
                if missed > 0 {
                    timer.overruns += missed;
                    warn!(
                        "Timer: '{}' woke {}us late, dropped {} fire(s)",
                        timer.name, late_us, missed
                    );
                }
                // Strictly after `now`, on the original phase.
                let next = (missed + 1)
                    .checked_mul(period_us)
                    .and_then(|step| deadline.as_micros().checked_add(step));
                match next {
                    Some(next) => TimerState::Armed {
                        deadline: Instant::from_micros(next),
                        period_us: Some(period_us),
                    },
                    None => {
                        warn!("Timer: '{}' ran off the end of the timeline, stopped", timer.name);
                        TimerState::Stopped
                    }
                }
            }
            None => TimerState::Stopped,
        };

        timer.fires += 1;
        trace!("Timer: '{}' fire #{} at {}", timer.name, timer.fires, now);
        (timer.expiry)();
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
