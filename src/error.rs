//! Unified error types for the SensorWatch firmware.
//!
//! Every subsystem error converts into [`Error`], keeping the top-level
//! control loop's handling uniform.  All variants are `Copy` so they can be
//! logged and carried through events without allocation.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// An outbound report could not be delivered.
    Report(ReportError),
    /// A remote `setRPM` call was rejected.
    Rpm(RpmError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Report(e) => write!(f, "report: {e}"),
            Self::Rpm(e) => write!(f, "setRPM: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC oneshot read returned a non-OK status.
    AdcReadFailed,
    /// Button GPIO read failed.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Failures of the outbound metrics POST.  Transport failures and non-2xx
/// statuses are logged the same way; neither is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// Could not open the HTTP connection.
    ConnectFailed,
    /// Request could not be written or submitted.
    RequestFailed,
    /// Response could not be read.
    ResponseFailed,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "HTTP connect failed"),
            Self::RequestFailed => write!(f, "HTTP request failed"),
            Self::ResponseFailed => write!(f, "HTTP response read failed"),
        }
    }
}

impl From<ReportError> for Error {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

// ---------------------------------------------------------------------------
// Remote setRPM errors
// ---------------------------------------------------------------------------

/// Rejection reasons for the remote `setRPM` function.  The remote caller
/// only ever sees the integer [`code`](RpmError::code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpmError {
    /// The voltage alert is not active.
    VoltageNotAlerted,
    /// Parsed value is outside 0..=255.
    OutOfRange,
    /// The PWM channel rejected the new duty; the old speed stands.
    ActuatorFailed,
}

impl RpmError {
    /// Result code returned to the remote caller.
    pub const fn code(self) -> i32 {
        match self {
            Self::VoltageNotAlerted => -1,
            Self::OutOfRange => -2,
            Self::ActuatorFailed => -3,
        }
    }
}

impl fmt::Display for RpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VoltageNotAlerted => write!(f, "voltage alert not active"),
            Self::OutOfRange => write!(f, "RPM out of range 0..=255"),
            Self::ActuatorFailed => write!(f, "motor PWM write failed"),
        }
    }
}

impl From<RpmError> for Error {
    fn from(e: RpmError) -> Self {
        Self::Rpm(e)
    }
}

// ---------------------------------------------------------------------------
// Remote protocol errors
// ---------------------------------------------------------------------------

/// Errors returned on the remote command channel.  These travel on the
/// wire, so the enum is serde-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteError {
    /// No function registered under the requested name.
    UnknownFunction,
    /// No observable variable under the requested name.
    UnknownVariable,
    /// Request dropped by the inbound token bucket.
    RateLimited,
    /// Frame could not be decoded.
    Malformed,
    /// Request arrived before the session handshake completed, or the
    /// handshake itself failed.
    Unauthenticated,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFunction => write!(f, "unknown function"),
            Self::UnknownVariable => write!(f, "unknown variable"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Malformed => write!(f, "malformed request"),
            Self::Unauthenticated => write!(f, "not authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
