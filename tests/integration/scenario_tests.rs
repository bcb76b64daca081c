//! End-to-end timing scenarios against simulated GPIO and simulated time.
//!
//! `System::step` is what the two execution contexts do, collapsed into
//! one thread: expire due timers, then drain the worker.

use core::time::Duration;

use tickwork::app::service::{System, bring_up};
use tickwork::config::TimingConfig;
use tickwork::drivers::gpio::{SimGpio, SimPin};
use tickwork::pins::PinId;
use tickwork::time::Instant;

const TICK_MS: u64 = 10;

fn started(gpio: &mut SimGpio, config: &TimingConfig) -> System<SimPin> {
    let mut system = System::wire(bring_up(gpio).unwrap()).unwrap();
    system.start(config, Instant::BOOT).unwrap();
    system
}

/// Step from `from` to `to` (inclusive) in fixed ticks; returns total
/// `(fires, work runs)`.
fn run_window(system: &mut System<SimPin>, from_ms: u64, to_ms: u64) -> (usize, usize) {
    let mut totals = (0, 0);
    for now_ms in (from_ms..=to_ms).step_by(TICK_MS as usize) {
        let (fired, ran) = system.step(Instant::from_millis(now_ms));
        totals = (totals.0 + fired, totals.1 + ran);
    }
    totals
}

/// Wake times from 0 to `end_ms` with pseudo-random gaps in `1..=max_gap_ms`,
/// always finishing exactly at `end_ms`.
fn irregular_wakeups(end_ms: u64, max_gap_ms: u64, mut seed: u64) -> Vec<u64> {
    let mut times = vec![0];
    let mut now = 0;
    while now < end_ms {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        now = (now + 1 + (seed >> 33) % max_gap_ms).min(end_ms);
        times.push(now);
    }
    times
}

#[test]
fn first_two_seconds_only_red_blinks() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());

    let (fires, runs) = run_window(&mut system, 0, 2_000);

    // Fast timer due at 1000, 1200, .., 2000.
    assert_eq!(fires, 6);
    assert_eq!(runs, 6);
    assert_eq!(system.timers().fire_count(system.red_timer()), 6);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 6);
    assert_eq!(gpio.monitor(PinId::LedGreen).toggles(), 0);
    assert_eq!(system.worker().executed(), 6);
}

#[test]
fn ten_seconds_of_both_routes() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());

    run_window(&mut system, 0, 10_000);

    let red = gpio.monitor(PinId::LedRed);
    let green = gpio.monitor(PinId::LedGreen);
    let blue = gpio.monitor(PinId::LedBlue);

    // Red: 1000..=10000 every 200 ms.
    assert_eq!(red.toggles(), 46);
    // Green: 6000..=10000 every 1000 ms.
    assert_eq!(green.toggles(), 5);
    assert!(!green.is_high(), "odd toggle count from active leaves green off");
    assert_eq!(blue.toggles(), 0);
    assert!(blue.is_high());

    assert_eq!(system.timers().overruns(system.red_timer()), 0);
    assert_eq!(system.timers().overruns(system.green_timer()), 0);
}

#[test]
fn green_toggles_in_the_timer_pass_itself() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());
    let green = gpio.monitor(PinId::LedGreen);

    system.timers_mut().expire(Instant::from_millis(6_000));
    // No worker pass yet: the direct route already toggled.
    assert_eq!(green.toggles(), 1);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 0);
}

#[test]
fn fires_while_the_worker_is_busy_coalesce() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());

    system.timers_mut().expire(Instant::from_millis(1_000));
    system.timers_mut().expire(Instant::from_millis(1_200));
    system.timers_mut().expire(Instant::from_millis(1_400));
    assert_eq!(system.timers().fire_count(system.red_timer()), 3);
    assert_eq!(system.worker().queued(), 1);

    assert_eq!(system.worker_mut().run_pending(), 1);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 1);

    // Next fire after the drain queues again.
    system.timers_mut().expire(Instant::from_millis(1_600));
    assert_eq!(system.worker_mut().run_pending(), 1);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 2);
}

#[test]
fn late_wakeup_drops_missed_fires_and_keeps_phase() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());
    let red = system.red_timer();

    system.step(Instant::from_millis(1_000));
    // Timer context stalls for 650 ms.
    assert_eq!(system.step(Instant::from_millis(1_650)), (1, 1));

    assert_eq!(system.timers().fire_count(red), 2);
    assert_eq!(system.timers().overruns(red), 2);
    assert_eq!(
        system.timers().remaining(red, Instant::from_millis(1_650)),
        Some(Duration::from_millis(150))
    );
}

#[test]
fn stopping_the_timer_does_not_cancel_queued_work() {
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &TimingConfig::default());
    let red = system.red_timer();

    system.timers_mut().expire(Instant::from_millis(1_000));
    system.timers_mut().stop(red).unwrap();
    assert!(system.red_work().is_pending());

    assert_eq!(system.worker_mut().run_pending(), 1);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 1);

    run_window(&mut system, 1_010, 3_000);
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 1);
}

#[test]
fn custom_cadence_from_config() {
    let config = TimingConfig::from_json(
        r#"{ "fast_initial_ms": 0, "fast_period_ms": 100, "slow_period_ms": 0 }"#,
    )
    .unwrap();
    let mut gpio = SimGpio::new();
    let mut system = started(&mut gpio, &config);

    run_window(&mut system, 0, 8_000);

    // Fast fires at 0 and every 100 ms through 8000.
    assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 81);
    // Slow is one-shot at 6000.
    assert_eq!(gpio.monitor(PinId::LedGreen).toggles(), 1);
    assert!(!system.timers().is_running(system.green_timer()));
}

#[test]
fn irregular_wakeups_leave_both_counts_intact() {
    for seed in [1, 7, 42, 1_234] {
        let mut gpio = SimGpio::new();
        let mut system = started(&mut gpio, &TimingConfig::default());

        // Gaps under the fast period: late but never a full period late.
        for now in irregular_wakeups(10_000, 199, seed) {
            system.step(Instant::from_millis(now));
        }

        let timers = system.timers();
        assert_eq!(timers.fire_count(system.green_timer()), 5, "seed {seed}");
        assert_eq!(timers.fire_count(system.red_timer()), 46, "seed {seed}");
        assert_eq!(timers.overruns(system.red_timer()), 0, "seed {seed}");
        assert_eq!(gpio.monitor(PinId::LedGreen).toggles(), 5);
        assert_eq!(gpio.monitor(PinId::LedRed).toggles(), 46);
    }
}

#[test]
fn long_stalls_hit_each_timer_independently() {
    for seed in [3, 99, 2_024] {
        let mut gpio = SimGpio::new();
        let mut system = started(&mut gpio, &TimingConfig::default());

        // Stalls up to 0.9 s: the fast timer loses fires, the slow one
        // (1 s period) never does.
        for now in irregular_wakeups(10_000, 900, seed) {
            system.step(Instant::from_millis(now));
        }

        let timers = system.timers();
        let (red, green) = (system.red_timer(), system.green_timer());
        assert_eq!(timers.fire_count(green), 5, "seed {seed}");
        assert_eq!(timers.overruns(green), 0, "seed {seed}");
        assert_eq!(
            timers.fire_count(red) + timers.overruns(red),
            46,
            "seed {seed}: every fast deadline is either fired or counted"
        );
    }
}
