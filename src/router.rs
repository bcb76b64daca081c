//! Event router: the callbacks that connect timer expiry to a pin.
//!
//! Two routes exist:
//!
//! - **Direct**: the timer callback toggles the pin itself, in the timer
//!   context. Lowest latency, but it lengthens the time spent in the
//!   constrained context. Only acceptable because a toggle is O(1) and
//!   never blocks.
//! - **Deferred**: the timer callback only submits a [`WorkItem`]; the
//!   item's handler toggles the pin later from the worker context. This is
//!   the pattern for anything that is not guaranteed O(1).
//!
//! Each builder takes the pin by value, so a pin ends up owned by exactly
//! one callback or handler.

use embedded_hal::digital::StatefulOutputPin;
use log::{error, warn};

use crate::timer::TimerFn;
use crate::workq::{WorkFn, WorkItem};

/// Timer callback that toggles `pin` in the timer context.
pub fn direct_toggle<P>(label: &'static str, mut pin: P) -> TimerFn
where
    P: StatefulOutputPin + Send + 'static,
{
    Box::new(move || toggle(label, &mut pin))
}

/// Timer callback that hands the toggle to the worker context.
pub fn deferred_submit(item: WorkItem) -> TimerFn {
    Box::new(move || {
        if let Err(e) = item.submit() {
            error!("Router: {}, fire lost", e);
        }
    })
}

/// Work handler that toggles `pin` from the worker context.
pub fn toggle_handler<P>(label: &'static str, mut pin: P) -> WorkFn
where
    P: StatefulOutputPin + Send + 'static,
{
    Box::new(move || toggle(label, &mut pin))
}

fn toggle<P: StatefulOutputPin>(label: &'static str, pin: &mut P) {
    if let Err(e) = pin.toggle() {
        warn!("Router: {} toggle failed: {:?}", label, e);
    }
}
