//! Host console logging.
//!
//! On the board `esp_idf_logger` routes the `log` facade to the IDF log
//! output. Host runs install a `tracing-subscriber` fmt layer on stderr
//! instead; `log` records reach it through the `tracing-log` bridge that
//! `init` sets up. The filter comes from `TICKWORK_LOG` using `EnvFilter`
//! directives (`debug`, `tickwork::timer=trace,info`, ...), default `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "TICKWORK_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter from `directives`, falling back to `info` when absent or invalid.
pub fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the stderr subscriber and the `log` bridge.
pub fn init() -> Result<(), TryInitError> {
    let directives = std::env::var(LOG_ENV).ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter(directives.as_deref()))
        .try_init()
}
