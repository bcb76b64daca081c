//! Worker context.
//!
//! Runs [`Worker::run`] on a dedicated thread under an
//! `edge_executor::LocalExecutor`. The worker future sleeps on the ready
//! channel and wakes as soon as a timer callback submits an item, so
//! there is no polling interval.
//!
//! Handlers run here one at a time, in submission order.

use std::io;
use std::thread::JoinHandle;

use log::info;

use crate::workq::Worker;

use super::task_pin::{self, WORKER_TASK};

fn run_worker_loop(worker: Worker) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    executor.spawn(worker.run()).detach();

    info!("Worker context started");

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Spawn the worker context on APP_CPU, below the timer context.
pub fn spawn(worker: Worker) -> io::Result<JoinHandle<()>> {
    task_pin::spawn(WORKER_TASK, move || run_worker_loop(worker))
}
