//! tickwork: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  main task (lowest)    foreground loop, "+" every 500 ms     │
//! │                                                              │
//! │  tick-timer (pri 10)   TimerSubsystem                        │
//! │     green_timer ──direct toggle──────────────▶ led_green     │
//! │     red_timer   ──submit──┐                                  │
//! │                           ▼                                  │
//! │  tick-worker (pri 5)   Worker: red_led_work ──▶ led_red      │
//! │                                                              │
//! │  led_blue: configured active, never touched again            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Startup is a readiness gate: if any LED is not ready or fails to
//! configure, the failure is reported and the program halts before a
//! single timer is armed.

#![deny(unused_must_use)]

use anyhow::Result;
use log::error;

use tickwork::adapters::log_sink::LogEventSink;
use tickwork::adapters::time::MonotonicClock;
use tickwork::app::events::AppEvent;
use tickwork::app::ports::{EventSink, TimePort};
use tickwork::app::service::{self, System};
use tickwork::config::TimingConfig;
use tickwork::drivers::{hw_timer, work_task};
use tickwork::foreground::ForegroundLoop;
use tickwork::pins;

#[cfg(target_os = "espidf")]
use tickwork::drivers::gpio::EspGpio as PlatformGpio;
#[cfg(not(target_os = "espidf"))]
use tickwork::drivers::gpio::SimGpio as PlatformGpio;

fn main() -> Result<()> {
    // ── 1. Bootstrap + logging ────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    tickwork::adapters::console::init()?;

    let mut sink = LogEventSink::new();
    sink.emit(&AppEvent::Banner {
        board: pins::BOARD,
        version: env!("CARGO_PKG_VERSION"),
    });

    // ── 2. Config ─────────────────────────────────────────────
    let config = TimingConfig::load();

    // ── 3. Readiness gate + wiring ────────────────────────────
    #[cfg(target_os = "espidf")]
    let mut gpio = PlatformGpio;
    #[cfg(not(target_os = "espidf"))]
    let mut gpio = PlatformGpio::new();

    let clock = MonotonicClock::new();
    let system = service::bring_up(&mut gpio)
        .and_then(System::wire)
        .and_then(|mut system| {
            system.start(&config, clock.now())?;
            Ok(system)
        });
    let system = match system {
        Ok(system) => system,
        Err(e) => {
            service::report_init_failure(e, &mut sink);
            halt();
        }
    };

    // ── 4. Hand off to the execution contexts ─────────────────
    let (timers, worker, _led_blue) = system.into_parts();
    work_task::spawn(worker)?;
    hw_timer::spawn(timers, clock)?;

    // ── 5. Foreground loop (never returns) ────────────────────
    ForegroundLoop::new(config.heartbeat()).run(&mut sink, std::thread::sleep)
}

/// Terminal state after a startup failure. Nothing is armed, nothing is
/// retried.
fn halt() -> ! {
    error!("Halted");
    loop {
        std::thread::park();
    }
}
