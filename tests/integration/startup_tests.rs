//! Readiness gate: ordering of checks, fatal errors, nothing armed on failure.

use crate::mock_hw::{GpioCall, MockEventSink, MockGpio};
use tickwork::app::events::AppEvent;
use tickwork::app::service::{System, bring_up, report_init_failure};
use tickwork::config::TimingConfig;
use tickwork::error::{DeviceError, Error};
use tickwork::pins::PinId;
use tickwork::time::Instant;

use GpioCall::{Configure, IsReady};
use PinId::{LedBlue, LedGreen, LedRed};

#[test]
fn all_ready_checks_every_pin_before_configuring_any() {
    let mut gpio = MockGpio::new();
    assert!(bring_up(&mut gpio).is_ok());
    assert_eq!(
        gpio.calls(),
        [
            IsReady(LedRed),
            IsReady(LedGreen),
            IsReady(LedBlue),
            Configure(LedRed),
            Configure(LedGreen),
            Configure(LedBlue),
        ]
    );
}

#[test]
fn not_ready_pin_is_fatal_and_nothing_is_configured() {
    let mut gpio = MockGpio::new().with_not_ready(LedGreen);
    let err = bring_up(&mut gpio).err().unwrap();

    assert_eq!(err, Error::DeviceNotReady(LedGreen));
    assert!(err.is_fatal());
    assert_eq!(gpio.calls(), [IsReady(LedRed), IsReady(LedGreen)]);
}

#[test]
fn nothing_ready_reports_the_first_pin() {
    let mut gpio = MockGpio::new()
        .with_not_ready(LedRed)
        .with_not_ready(LedGreen)
        .with_not_ready(LedBlue);
    assert_eq!(bring_up(&mut gpio).err(), Some(Error::DeviceNotReady(LedRed)));
    assert_eq!(gpio.total_toggles(), 0);
}

#[test]
fn configuration_failure_is_fatal_and_stops_the_sequence() {
    let mut gpio = MockGpio::new().with_config_failure(LedGreen);
    let err = bring_up(&mut gpio).err().unwrap();

    assert_eq!(
        err,
        Error::ConfigurationFailed {
            pin: LedGreen,
            cause: DeviceError::Driver(-1),
        }
    );
    assert!(err.is_fatal());
    assert_eq!(gpio.calls().last(), Some(&Configure(LedGreen)));
    assert!(!gpio.calls().contains(&Configure(LedBlue)));
}

#[test]
fn init_failure_reaches_the_console_sink() {
    let mut gpio = MockGpio::new().with_not_ready(LedBlue);
    let mut sink = MockEventSink::default();

    let err = bring_up(&mut gpio).err().unwrap();
    report_init_failure(err, &mut sink);

    assert_eq!(
        sink.events,
        [AppEvent::InitFailed(Error::DeviceNotReady(LedBlue))]
    );
}

#[test]
fn successful_bring_up_leaves_every_pin_untoggled_until_timers_run() {
    let mut gpio = MockGpio::new();
    let pins = bring_up(&mut gpio).unwrap();
    let mut system = System::wire(pins).unwrap();
    system.start(&TimingConfig::default(), Instant::BOOT).unwrap();

    // Just before the first fast fire.
    system.step(Instant::from_millis(999));
    assert_eq!(gpio.total_toggles(), 0);

    system.step(Instant::from_millis(1_000));
    assert_eq!(gpio.toggles(LedRed), 1);
}

#[test]
fn toggle_failure_is_logged_not_fatal() {
    let mut gpio = MockGpio::new().with_toggle_failure(LedRed);
    let mut system = System::wire(bring_up(&mut gpio).unwrap()).unwrap();
    system.start(&TimingConfig::default(), Instant::BOOT).unwrap();

    system.step(Instant::from_millis(1_000));
    system.step(Instant::from_millis(1_200));

    // Attempts keep coming; the timer is still armed.
    assert_eq!(gpio.toggles(LedRed), 2);
    assert!(system.timers().is_running(system.red_timer()));
}
