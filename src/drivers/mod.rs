//! GPIO driver and the execution contexts (timer, worker) it runs under.

pub mod gpio;
pub mod hw_timer;
pub mod task_pin;
#[cfg(target_os = "espidf")]
mod time_driver;
pub mod work_task;
