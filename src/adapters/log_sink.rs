//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing console events through the `log`
//! facade (UART / USB-CDC on the board, stderr on the host).

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Banner { board, version } => {
                info!("Hello World! {}", board);
                info!("tickwork v{}", version);
            }
            AppEvent::InitFailed(e) => {
                error!("Init failed: {}", e);
            }
            AppEvent::Heartbeat(_) => {
                info!("+");
            }
        }
    }
}
