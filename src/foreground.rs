//! Foreground loop: the lowest-priority activity.
//!
//! One state, no transitions: sleep a fixed interval, emit a liveness
//! marker, repeat. It shares nothing with the timer table or the work
//! queue, and nothing else depends on it making progress.

use core::time::Duration;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct ForegroundLoop {
    interval: Duration,
    beats: u64,
}

impl ForegroundLoop {
    pub fn new(interval: Duration) -> Self {
        Self { interval, beats: 0 }
    }

    /// One iteration: sleep, then emit the marker.
    pub fn step(&mut self, sink: &mut impl EventSink, sleep: &mut impl FnMut(Duration)) {
        sleep(self.interval);
        self.beats += 1;
        sink.emit(&AppEvent::Heartbeat(self.beats));
    }

    /// Run forever.
    pub fn run(mut self, sink: &mut impl EventSink, mut sleep: impl FnMut(Duration)) -> ! {
        loop {
            self.step(sink, &mut sleep);
        }
    }

    pub fn beats(&self) -> u64 {
        self.beats
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
