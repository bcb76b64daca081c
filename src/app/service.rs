//! Startup gate and ownership wiring.
//!
//! [`bring_up`] is the readiness gate: every LED must report ready, then
//! every LED must configure as an output, before anything else happens.
//! [`System`] then takes the configured pins by value and binds each one
//! to exactly one route:
//!
//! ```text
//!  green_timer (slow) ──direct──────────────────────────▶ led_green
//!  red_timer   (fast) ──submit──▶ red_led_work ──worker──▶ led_red
//!                                                          led_blue (held, idle)
//! ```
//!
//! Nothing here is global: the pins, timer table, and worker are values
//! owned by `System` until [`System::into_parts`] hands them to their
//! execution contexts.

use embedded_hal::digital::StatefulOutputPin;
use log::info;

use crate::config::TimingConfig;
use crate::error::{Error, Result};
use crate::pins::PinId;
use crate::router;
use crate::time::Instant;
use crate::timer::{TimerHandle, TimerSubsystem};
use crate::workq::{WorkItem, Worker};

use super::events::AppEvent;
use super::ports::{EventSink, GpioPort};

/// The three configured LED lines.
pub struct LedPins<P> {
    pub red: P,
    pub green: P,
    pub blue: P,
}

/// Readiness gate. Checks every line before configuring any of them.
pub fn bring_up<G: GpioPort>(gpio: &mut G) -> Result<LedPins<G::Pin>> {
    for pin in PinId::ALL {
        if !gpio.is_ready(pin) {
            return Err(Error::DeviceNotReady(pin));
        }
    }

    let mut configure = |pin: PinId| {
        gpio.configure_output(pin)
            .map_err(|cause| Error::ConfigurationFailed { pin, cause })
    };
    let red = configure(PinId::LedRed)?;
    let green = configure(PinId::LedGreen)?;
    let blue = configure(PinId::LedBlue)?;

    info!("Startup: all LEDs ready and configured");
    Ok(LedPins { red, green, blue })
}

/// Report a startup failure on the console. The caller halts afterwards.
pub fn report_init_failure(err: Error, sink: &mut impl EventSink) {
    sink.emit(&AppEvent::InitFailed(err));
}

/// Timers, worker, and pins wired together, timers not yet started.
pub struct System<P> {
    timers: TimerSubsystem,
    worker: Worker,
    green_timer: TimerHandle,
    red_timer: TimerHandle,
    red_work: WorkItem,
    idle: P,
}

impl<P> System<P>
where
    P: StatefulOutputPin + Send + 'static,
{
    /// Bind the pins to their routes.
    pub fn wire(pins: LedPins<P>) -> Result<Self> {
        let LedPins { red, green, blue } = pins;

        let mut worker = Worker::new();
        let red_work = worker.register("red_led_work", router::toggle_handler("led_red", red))?;

        let mut timers = TimerSubsystem::new();
        let green_timer = timers.create(
            "green_timer",
            router::direct_toggle("led_green", green),
            None,
        )?;
        let red_timer = timers.create("red_timer", router::deferred_submit(red_work.clone()), None)?;

        Ok(Self {
            timers,
            worker,
            green_timer,
            red_timer,
            red_work,
            idle: blue,
        })
    }

    /// Arm both timers relative to `now`.
    pub fn start(&mut self, config: &TimingConfig, now: Instant) -> Result<()> {
        self.timers.start(
            self.green_timer,
            now,
            config.slow_initial(),
            config.slow_period(),
        )?;
        self.timers.start(
            self.red_timer,
            now,
            config.fast_initial(),
            config.fast_period(),
        )?;
        Ok(())
    }

    /// Advance simulated time: fire due timers, then drain the worker.
    /// Returns `(timer fires, work executions)`.
    pub fn step(&mut self, now: Instant) -> (usize, usize) {
        let fired = self.timers.expire(now);
        let ran = self.worker.run_pending();
        (fired, ran)
    }

    pub fn timers(&self) -> &TimerSubsystem {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerSubsystem {
        &mut self.timers
    }

    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    pub fn worker_mut(&mut self) -> &mut Worker {
        &mut self.worker
    }

    pub fn green_timer(&self) -> TimerHandle {
        self.green_timer
    }

    pub fn red_timer(&self) -> TimerHandle {
        self.red_timer
    }

    pub fn red_work(&self) -> &WorkItem {
        &self.red_work
    }

    /// Hand the timer table and worker to their contexts. The idle pin
    /// comes back so it stays configured for the life of the program.
    pub fn into_parts(self) -> (TimerSubsystem, Worker, P) {
        (self.timers, self.worker, self.idle)
    }
}
