//! Unified error types for the tickwork firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the startup
//! path can report any failure uniformly before halting. All variants are
//! `Copy` and carry no heap data, so they can be passed out of constrained
//! contexts without allocation.

use core::fmt;

use crate::pins::PinId;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required output line reported not-ready at startup.
    DeviceNotReady(PinId),
    /// `configure_output` failed for a line.
    ConfigurationFailed { pin: PinId, cause: DeviceError },
    /// Every timer slot is already taken.
    TimerTableFull,
    /// Every work item slot is already taken.
    WorkTableFull,
    /// The work queue refused an enqueue for the named item.
    WorkQueueOverflow(&'static str),
    /// A timer handle that this subsystem never issued.
    UnknownTimer,
    /// A repeat period that does not fit the microsecond timeline.
    PeriodOutOfRange,
    /// Timing configuration failed validation.
    Config(&'static str),
}

impl Error {
    /// Startup errors leave the board unusable; nothing retries them.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotReady(pin) => write!(f, "device not ready: {pin}"),
            Self::ConfigurationFailed { pin, cause } => {
                write!(f, "configure {pin} as output failed: {cause}")
            }
            Self::TimerTableFull => write!(f, "timer table full"),
            Self::WorkTableFull => write!(f, "work item table full"),
            Self::WorkQueueOverflow(name) => write!(f, "work queue overflow ({name})"),
            Self::UnknownTimer => write!(f, "unknown timer handle"),
            Self::PeriodOutOfRange => write!(f, "timer period out of range"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO driver errors
// ---------------------------------------------------------------------------

/// Failure reported by the GPIO driver underneath a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The driver returned a non-OK status code.
    Driver(i32),
    /// The line cannot be used as an output.
    Rejected,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(rc) => write!(f, "driver error (rc={rc})"),
            Self::Rejected => write!(f, "line rejected output mode"),
        }
    }
}

impl embedded_hal::digital::Error for DeviceError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
