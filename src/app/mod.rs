//! Application core: startup gate, ownership wiring, and the ports the
//! core talks through.
//!
//! All interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
