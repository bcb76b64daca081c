//! Port traits: the boundary between the dispatch core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ timers · work queue · router
//! ```
//!
//! The GPIO driver, the clock, and the console all sit behind these traits
//! so the core runs unchanged against the ESP-IDF drivers, the host
//! simulation, or a test mock.

use embedded_hal::digital::StatefulOutputPin;

use crate::error::DeviceError;
use crate::pins::PinId;
use crate::time::Instant;

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// GPIO capability consumed at startup.
///
/// `configure_output` hands back the configured line as an owned pin.
/// Whoever holds that value is the only context able to toggle it, so the
/// one-writer-per-pin rule is enforced by ownership instead of locking.
pub trait GpioPort {
    /// A configured output line. `toggle` comes from `embedded-hal`.
    type Pin: StatefulOutputPin + Send + 'static;

    /// Whether the controller behind `pin` finished initialising.
    fn is_ready(&self, pin: PinId) -> bool;

    /// Configure `pin` as an output, driven active (high).
    fn configure_output(&mut self, pin: PinId) -> Result<Self::Pin, DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for the timer context.
pub trait TimePort {
    fn now(&self) -> Instant;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → console)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget console output. Implementations must not block.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
