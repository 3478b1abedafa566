//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks, HTTP, clock) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

use super::reporter::{ReportRequest, ReportResponse};
use super::state::SensorSnapshot;
use crate::error::{ActuatorError, ReportError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Sample both analog channels and return converted readings.
    fn read_all(&mut self) -> SensorSnapshot;

    /// `true` while the push-button is held.  Read failures report `false`.
    fn button_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the indicator LED.
    fn set_led(&mut self, on: bool);

    /// Set motor PWM duty as an 8-bit speed command.  On error the
    /// previous duty is still in effect.
    fn set_motor_rpm(&mut self, rpm: u8) -> Result<(), ActuatorError>;

    /// LED low, motor stopped.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / notifications)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Report port (driven adapter: domain → cloud metrics endpoint)
// ───────────────────────────────────────────────────────────────

/// One synchronous form-encoded POST.  A non-2xx status is not an error
/// at this layer; only transport failures are.
pub trait ReportPort {
    fn post_form(&mut self, request: &ReportRequest) -> Result<ReportResponse, ReportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port
// ───────────────────────────────────────────────────────────────

/// Network link used by the reporter and the remote transport.
pub trait ConnectivityPort {
    type Error: core::fmt::Display;

    /// Bring the link up, blocking until associated or failed.
    fn connect(&mut self) -> Result<(), Self::Error>;

    fn disconnect(&mut self) -> Result<(), Self::Error>;

    fn is_connected(&self) -> bool;
}
