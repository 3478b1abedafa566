//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for SensorWatch: alert
//! evaluation, button-gated LED control, the remote motor command and
//! rate-limited reporting.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod reporter;
pub mod service;
pub mod state;
