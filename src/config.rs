//! Timing configuration.
//!
//! The cadence of both timers and of the foreground heartbeat. Defaults
//! reproduce the reference demo; a JSON file can override them on the host.

use core::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a JSON timing file (host only).
pub const CONFIG_ENV: &str = "TICKWORK_CONFIG";

/// Timer and heartbeat cadence, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    // --- Fast timer (deferred route, red LED) ---
    /// Delay before the first fast-timer fire.
    pub fast_initial_ms: u32,
    /// Fast-timer repeat period; 0 = one-shot.
    pub fast_period_ms: u32,

    // --- Slow timer (direct route, green LED) ---
    /// Delay before the first slow-timer fire.
    pub slow_initial_ms: u32,
    /// Slow-timer repeat period; 0 = one-shot.
    pub slow_period_ms: u32,

    // --- Foreground ---
    /// Interval between liveness markers.
    pub heartbeat_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fast_initial_ms: 1_000,
            fast_period_ms: 200,
            slow_initial_ms: 6_000,
            slow_period_ms: 1_000,
            heartbeat_ms: 500,
        }
    }
}

impl TimingConfig {
    /// Reject settings the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_ms == 0 {
            return Err(Error::Config("heartbeat_ms must be > 0"));
        }
        if self.fast_period_ms == 0 && self.slow_period_ms == 0 {
            return Err(Error::Config("at least one timer must repeat"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed timing JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from the file named by [`CONFIG_ENV`], falling back to defaults.
    #[cfg(not(target_os = "espidf"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Self::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|_| Error::Config("timing file unreadable"))
            .and_then(|text| Self::from_json(&text));
        match parsed {
            Ok(cfg) => {
                info!("Config loaded from {}", path);
                cfg
            }
            Err(e) => {
                warn!("Config {} rejected ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// The board has no config store; always the compiled-in defaults.
    #[cfg(target_os = "espidf")]
    pub fn load() -> Self {
        info!("Config: using compiled-in defaults");
        Self::default()
    }

    pub fn fast_initial(&self) -> Duration {
        Duration::from_millis(self.fast_initial_ms.into())
    }

    pub fn fast_period(&self) -> Option<Duration> {
        period(self.fast_period_ms)
    }

    pub fn slow_initial(&self) -> Duration {
        Duration::from_millis(self.slow_initial_ms.into())
    }

    pub fn slow_period(&self) -> Option<Duration> {
        period(self.slow_period_ms)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.into())
    }
}

fn period(ms: u32) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms.into()))
}
