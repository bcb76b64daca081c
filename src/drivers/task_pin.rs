//! Spawning the execution contexts as pinned FreeRTOS tasks.
//!
//! ESP-IDF runs `std::thread` on pthreads, and `esp_pthread_set_cfg()`
//! decides core, priority and stack of the *next* pthread created by the
//! calling thread. [`spawn`] sets that config and creates the thread in
//! one step, so the pair is never split by another spawn.
//!
//! Both contexts live on APP_CPU; PRO_CPU is left to the IDF system tasks.
//! Ordering of preemption: timer context > worker context > main task
//! (the foreground loop, priority 1).
//!
//! On the host only the name and stack size apply.

use std::io;
use std::thread::JoinHandle;

/// ESP32-S3 APP_CPU.
pub const APP_CPU: u8 = 1;

/// Placement and sizing of one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated task name.
    pub name: &'static str,
    pub core: u8,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// Name without the trailing NUL.
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Timer callback context.
pub const TIMER_TASK: TaskSpec = TaskSpec {
    name: "tick-timer\0",
    core: APP_CPU,
    priority: 10,
    stack_kb: 8,
};

/// Deferred work context.
pub const WORKER_TASK: TaskSpec = TaskSpec {
    name: "tick-worker\0",
    core: APP_CPU,
    priority: 5,
    stack_kb: 8,
};

#[cfg(target_os = "espidf")]
pub fn spawn(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    // SAFETY: `cfg` outlives the call and `spec.name` is a 'static
    // null-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = i32::from(spec.core);
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!(
            "{}: esp_pthread_set_cfg rc={ret}",
            spec.display_name()
        )));
    }

    log::info!(
        "Task '{}': core {}, pri {}, {}KB stack",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );
    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

#[cfg(not(target_os = "espidf"))]
pub fn spawn(spec: TaskSpec, f: impl FnOnce() + Send + 'static) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Task '{}' (sim, {}KB stack)",
        spec.display_name(),
        spec.stack_kb
    );
    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
}
