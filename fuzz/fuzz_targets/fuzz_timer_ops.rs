//! Fuzz target: `TimerSubsystem` + `Worker` operation sequences
//!
//! Decodes the input as a stream of 3-byte ops (start / stop / advance /
//! drain / submit) against two timers and one work item, and checks:
//! - No panics under any op sequence
//! - Time never runs backwards and `next_deadline` is never in the past
//!   after an `expire` pass
//! - A stopped timer never fires
//! - The worker never executes more often than the item was submitted
//!
//! cargo fuzz run fuzz_timer_ops

#![no_main]

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use libfuzzer_sys::fuzz_target;
use tickwork::time::Instant;
use tickwork::timer::TimerSubsystem;
use tickwork::workq::{Submitted, Worker};

fuzz_target!(|data: &[u8]| {
    let mut timers = TimerSubsystem::new();
    let mut worker = Worker::new();
    let runs = Arc::new(AtomicU64::new(0));
    let r = runs.clone();
    let item = worker
        .register("fuzz", Box::new(move || {
            r.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();

    let submit_item = item.clone();
    let a = timers
        .create("a", Box::new(move || {
            let _ = submit_item.submit();
        }), None)
        .unwrap();
    let b = timers.create("b", Box::new(|| {}), None).unwrap();

    let mut now_us: u64 = 0;
    let mut queued: u64 = 0;

    for op in data.chunks_exact(3) {
        let handle = if op[1] & 1 == 0 { a } else { b };
        let arg = u64::from(op[2]);
        match op[0] % 5 {
            0 => {
                let period = (op[1] & 2 != 0).then(|| Duration::from_micros(arg * 37));
                timers
                    .start(handle, Instant::from_micros(now_us), Duration::from_micros(arg * 11), period)
                    .unwrap();
            }
            1 => {
                timers.stop(handle).unwrap();
                let before = timers.fire_count(handle);
                timers.expire(Instant::from_micros(now_us + 1_000_000));
                assert_eq!(timers.fire_count(handle), before, "stopped timer fired");
                now_us += 1_000_000;
            }
            2 => {
                now_us += arg * arg;
                timers.expire(Instant::from_micros(now_us));
                if let Some(next) = timers.next_deadline() {
                    assert!(next.as_micros() > now_us, "deadline left in the past");
                }
            }
            3 => {
                worker.run_pending();
            }
            _ => {
                if item.submit() == Ok(Submitted::Queued) {
                    queued += 1;
                }
            }
        }
    }

    worker.run_pending();
    assert!(runs.load(Ordering::Relaxed) <= queued + timers.fire_count(a));
});
