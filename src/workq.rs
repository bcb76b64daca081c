//! Deferred work queue.
//!
//! Timer callbacks must not block, so anything that may take time is
//! handed to the worker context as a [`WorkItem`]. Each item is bound to
//! one handler at registration and can be queued at most once: submitting
//! an item that is already waiting is coalesced into a no-op.
//!
//! ```text
//! ┌──────────────┐ submit() ┌──────────────────────┐ receive() ┌──────────────┐
//! │ Timer ctx    │─────────▶│ pending[id] flag     │──────────▶│ Worker ctx   │
//! │ (producers,  │          │ + FIFO of ids        │           │ (single      │
//! │  non-block)  │          │ (embassy-sync chan)  │           │  consumer)   │
//! └──────────────┘          └──────────────────────┘           └──────────────┘
//! ```
//!
//! The enqueue path is one atomic swap plus a `try_send`, so it is bounded
//! time and safe from any number of producers. Because an id is in the
//! channel at most once, a channel as deep as the item table never fills.
//! The pending flag is cleared just before the handler runs, so a
//! submission made while the handler executes queues it again.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::{debug, info, trace};

use crate::error::{Error, Result};

/// Maximum number of distinct work items.
pub const MAX_WORK_ITEMS: usize = 4;

/// Work handler. Runs in the worker context and may block.
pub type WorkFn = Box<dyn FnMut() + Send>;

/// Outcome of [`WorkItem::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// The item was idle and is now queued.
    Queued,
    /// The item was already queued; nothing changed.
    Coalesced,
}

struct Shared {
    pending: [AtomicBool; MAX_WORK_ITEMS],
    ready: Channel<CriticalSectionRawMutex, u8, MAX_WORK_ITEMS>,
}

/// Producer-side handle to a registered work item. Cheap to clone and
/// `Send`, so it can be moved into a timer callback.
#[derive(Clone)]
pub struct WorkItem {
    id: u8,
    name: &'static str,
    shared: Arc<Shared>,
}

impl WorkItem {
    /// Queue the item for the worker context.
    ///
    /// Never blocks. Returns [`Submitted::Coalesced`] if the item is
    /// already waiting to run.
    pub fn submit(&self) -> Result<Submitted> {
        let pending = &self.shared.pending[self.id as usize];
        if pending.swap(true, Ordering::AcqRel) {
            debug!("WorkQ: '{}' already queued, coalesced", self.name);
            return Ok(Submitted::Coalesced);
        }
        if self.shared.ready.try_send(self.id).is_err() {
            pending.store(false, Ordering::Release);
            return Err(Error::WorkQueueOverflow(self.name));
        }
        Ok(Submitted::Queued)
    }

    /// Whether the item is queued and has not started running yet.
    pub fn is_pending(&self) -> bool {
        self.shared.pending[self.id as usize].load(Ordering::Acquire)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pending", &self.is_pending())
            .finish()
    }
}

struct Handler {
    name: &'static str,
    run: WorkFn,
}

/// Consumer side: owns every handler and drains the queue one item at a
/// time, in submission order.
pub struct Worker {
    shared: Arc<Shared>,
    handlers: Vec<Handler, MAX_WORK_ITEMS>,
    executed: u64,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: [const { AtomicBool::new(false) }; MAX_WORK_ITEMS],
                ready: Channel::new(),
            }),
            handlers: Vec::new(),
            executed: 0,
        }
    }

    /// Bind `handler` to a new work item.
    pub fn register(&mut self, name: &'static str, handler: WorkFn) -> Result<WorkItem> {
        let id = self.handlers.len() as u8;
        self.handlers
            .push(Handler { name, run: handler })
            .map_err(|_| Error::WorkTableFull)?;
        info!("WorkQ: registered '{}' as item {}", name, id);
        Ok(WorkItem {
            id,
            name,
            shared: self.shared.clone(),
        })
    }

    /// Worker context main loop. Suspends while the queue is empty.
    pub async fn run(mut self) {
        info!("WorkQ: worker running ({} items)", self.handlers.len());
        loop {
            let id = self.shared.ready.receive().await;
            self.execute(id);
        }
    }

    /// Run everything queued right now, without waiting. Returns the
    /// number of handlers executed.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(id) = self.shared.ready.try_receive() {
            self.execute(id);
            ran += 1;
        }
        ran
    }

    /// Total handler executions since creation.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Items currently waiting.
    pub fn queued(&self) -> usize {
        self.shared.ready.len()
    }

    fn execute(&mut self, id: u8) {
        self.shared.pending[id as usize].store(false, Ordering::Release);
        let Some(handler) = self.handlers.get_mut(id as usize) else {
            return;
        };
        trace!("WorkQ: running '{}'", handler.name);
        (handler.run)();
        self.executed += 1;
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
