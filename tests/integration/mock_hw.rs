//! Mock GPIO adapter for integration tests.
//!
//! Records every port call in order so tests can assert on the full
//! startup sequence and on every toggle, from whichever thread made it.

use std::sync::{Arc, Mutex};

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use tickwork::app::events::AppEvent;
use tickwork::app::ports::{EventSink, GpioPort};
use tickwork::error::DeviceError;
use tickwork::pins::PinId;

// ── GPIO call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    IsReady(PinId),
    Configure(PinId),
    Toggle(PinId),
}

type CallLog = Arc<Mutex<Vec<GpioCall>>>;

// ── MockGpio ──────────────────────────────────────────────────

pub struct MockGpio {
    calls: CallLog,
    not_ready: Vec<PinId>,
    config_fails: Vec<PinId>,
    toggle_fails: Vec<PinId>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            not_ready: Vec::new(),
            config_fails: Vec::new(),
            toggle_fails: Vec::new(),
        }
    }

    pub fn with_not_ready(mut self, pin: PinId) -> Self {
        self.not_ready.push(pin);
        self
    }

    pub fn with_config_failure(mut self, pin: PinId) -> Self {
        self.config_fails.push(pin);
        self
    }

    pub fn with_toggle_failure(mut self, pin: PinId) -> Self {
        self.toggle_fails.push(pin);
        self
    }

    pub fn calls(&self) -> Vec<GpioCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn toggles(&self, pin: PinId) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == GpioCall::Toggle(pin))
            .count()
    }

    pub fn total_toggles(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GpioCall::Toggle(_)))
            .count()
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for MockGpio {
    type Pin = MockPin;

    fn is_ready(&self, pin: PinId) -> bool {
        self.calls.lock().unwrap().push(GpioCall::IsReady(pin));
        !self.not_ready.contains(&pin)
    }

    fn configure_output(&mut self, pin: PinId) -> Result<MockPin, DeviceError> {
        self.calls.lock().unwrap().push(GpioCall::Configure(pin));
        if self.config_fails.contains(&pin) {
            return Err(DeviceError::Driver(-1));
        }
        Ok(MockPin {
            pin,
            high: true,
            fail_toggle: self.toggle_fails.contains(&pin),
            calls: self.calls.clone(),
        })
    }
}

// ── MockPin ───────────────────────────────────────────────────

pub struct MockPin {
    pin: PinId,
    high: bool,
    fail_toggle: bool,
    calls: CallLog,
}

impl ErrorType for MockPin {
    type Error = DeviceError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), DeviceError> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), DeviceError> {
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, DeviceError> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, DeviceError> {
        Ok(!self.high)
    }

    fn toggle(&mut self) -> Result<(), DeviceError> {
        self.calls.lock().unwrap().push(GpioCall::Toggle(self.pin));
        if self.fail_toggle {
            return Err(DeviceError::Rejected);
        }
        self.high = !self.high;
        Ok(())
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct MockEventSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for MockEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
