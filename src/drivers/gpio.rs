//! GPIO output driver for the three status LEDs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`EspGpio`] configures lines through the `gpio_*` driver
//! calls and drives them with `gpio_set_level`.
//! On host/test: [`SimGpio`] keeps line levels in atomics, counts toggles,
//! and can be told that a line is not ready or refuses output mode.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use log::info;

use crate::app::ports::GpioPort;
use crate::error::DeviceError;
use crate::pins::PinId;

#[cfg(target_os = "espidf")]
pub use esp::{EspGpio, EspPin};

// ── Simulation ────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LineState {
    high: AtomicBool,
    toggles: AtomicU32,
}

#[derive(Debug)]
struct SimLine {
    ready: bool,
    config_error: Option<DeviceError>,
    state: Arc<LineState>,
}

/// In-memory GPIO controller for host runs and tests.
#[derive(Debug)]
pub struct SimGpio {
    lines: [SimLine; PinId::ALL.len()],
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGpio {
    /// All lines ready and configurable.
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| SimLine {
                ready: true,
                config_error: None,
                state: Arc::default(),
            }),
        }
    }

    /// Make `pin` report not-ready.
    #[must_use]
    pub fn not_ready(mut self, pin: PinId) -> Self {
        self.lines[pin.index()].ready = false;
        self
    }

    /// Make `configure_output(pin)` fail with `err`.
    #[must_use]
    pub fn failing_config(mut self, pin: PinId, err: DeviceError) -> Self {
        self.lines[pin.index()].config_error = Some(err);
        self
    }

    /// Read-only view of a line, usable from any thread.
    pub fn monitor(&self, pin: PinId) -> LineMonitor {
        LineMonitor {
            state: self.lines[pin.index()].state.clone(),
        }
    }
}

impl GpioPort for SimGpio {
    type Pin = SimPin;

    fn is_ready(&self, pin: PinId) -> bool {
        self.lines[pin.index()].ready
    }

    fn configure_output(&mut self, pin: PinId) -> Result<SimPin, DeviceError> {
        let line = &self.lines[pin.index()];
        if let Some(err) = line.config_error {
            return Err(err);
        }
        line.state.high.store(true, Ordering::Release);
        info!("gpio(sim): {} configured as output (GPIO{}, active)", pin, pin.gpio());
        Ok(SimPin {
            state: line.state.clone(),
        })
    }
}

/// Observer for a simulated line: current level and toggle count.
#[derive(Debug, Clone)]
pub struct LineMonitor {
    state: Arc<LineState>,
}

impl LineMonitor {
    pub fn is_high(&self) -> bool {
        self.state.high.load(Ordering::Acquire)
    }

    pub fn toggles(&self) -> u32 {
        self.state.toggles.load(Ordering::Acquire)
    }
}

/// A configured simulated output line.
#[derive(Debug)]
pub struct SimPin {
    state: Arc<LineState>,
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.state.high.store(false, Ordering::Release);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.state.high.store(true, Ordering::Release);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.state.high.load(Ordering::Acquire))
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.state.high.load(Ordering::Acquire))
    }

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.state.high.fetch_xor(true, Ordering::AcqRel);
        self.state.toggles.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
    use esp_idf_svc::sys::*;
    use log::info;

    use crate::app::ports::GpioPort;
    use crate::error::DeviceError;
    use crate::pins::PinId;

    fn check(ret: esp_err_t) -> Result<(), DeviceError> {
        if ret == ESP_OK as esp_err_t {
            Ok(())
        } else {
            Err(DeviceError::Driver(ret))
        }
    }

    /// GPIO controller backed by the ESP-IDF GPIO driver.
    pub struct EspGpio;

    impl GpioPort for EspGpio {
        type Pin = EspPin;

        fn is_ready(&self, pin: PinId) -> bool {
            let gpio = pin.gpio();
            (0..gpio_num_t_GPIO_NUM_MAX).contains(&gpio)
        }

        fn configure_output(&mut self, pin: PinId) -> Result<EspPin, DeviceError> {
            let gpio = pin.gpio();
            // SAFETY: called once per line from main() before any timer or
            // worker context exists; nothing else touches these GPIOs.
            unsafe {
                check(gpio_reset_pin(gpio))?;
                // Input-output so the pad level can be read back.
                check(gpio_set_direction(gpio, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT))?;
                check(gpio_set_level(gpio, 1))?;
            }
            info!("gpio: {} configured as output (GPIO{}, active)", pin, gpio);
            Ok(EspPin { gpio, high: true })
        }
    }

    /// A configured ESP-IDF output line.
    pub struct EspPin {
        gpio: i32,
        high: bool,
    }

    impl EspPin {
        fn drive(&mut self, high: bool) -> Result<(), DeviceError> {
            // SAFETY: the line was configured as output; this pin value is
            // its only owner.
            check(unsafe { gpio_set_level(self.gpio, u32::from(high)) })?;
            self.high = high;
            Ok(())
        }
    }

    impl ErrorType for EspPin {
        type Error = DeviceError;
    }

    impl OutputPin for EspPin {
        fn set_low(&mut self) -> Result<(), DeviceError> {
            self.drive(false)
        }

        fn set_high(&mut self) -> Result<(), DeviceError> {
            self.drive(true)
        }
    }

    impl StatefulOutputPin for EspPin {
        fn is_set_high(&mut self) -> Result<bool, DeviceError> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, DeviceError> {
            Ok(!self.high)
        }
    }
}
