//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                  |
//! |------------|--------------|------------------------------|
//! | `console`  | subscriber   | stderr (host only)           |
//! | `log_sink` | EventSink    | `log` facade                 |
//! | `time`     | TimePort     | esp_timer / `std::time`      |

#[cfg(not(target_os = "espidf"))]
pub mod console;
pub mod log_sink;
pub mod time;
