//! Outbound console events.
//!
//! Startup and the foreground loop emit these through the
//! [`EventSink`](super::ports::EventSink) port. The adapter decides where
//! they go (serial log on the board, stderr on the host).

use crate::error::Error;

/// Console-visible events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup banner identifying the running target.
    Banner {
        board: &'static str,
        version: &'static str,
    },

    /// Initialisation failed; the system halts after this.
    InitFailed(Error),

    /// Foreground liveness marker (carries the beat count).
    Heartbeat(u64),
}
