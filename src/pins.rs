//! GPIO pin assignments for the tickwork board.
//!
//! Single source of truth: drivers map a [`PinId`] to a GPIO number here
//! rather than hard-coding pin numbers.

use core::fmt;

// ---------------------------------------------------------------------------
// Status LEDs (discrete R/G/B, active HIGH)
// ---------------------------------------------------------------------------

pub const LED_RED_GPIO: i32 = 11;
pub const LED_GREEN_GPIO: i32 = 12;
pub const LED_BLUE_GPIO: i32 = 13;

/// Board name printed in the startup banner.
pub const BOARD: &str = env!("TICKWORK_BOARD");

/// The three output lines the firmware needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinId {
    LedRed,
    LedGreen,
    LedBlue,
}

impl PinId {
    /// Every required line, in readiness-check order.
    pub const ALL: [PinId; 3] = [PinId::LedRed, PinId::LedGreen, PinId::LedBlue];

    pub const fn gpio(self) -> i32 {
        match self {
            Self::LedRed => LED_RED_GPIO,
            Self::LedGreen => LED_GREEN_GPIO,
            Self::LedBlue => LED_BLUE_GPIO,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::LedRed => "led_red",
            Self::LedGreen => "led_green",
            Self::LedBlue => "led_blue",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
