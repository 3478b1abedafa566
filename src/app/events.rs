//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: serial log, cloud event publish, etc.

use crate::alert::{AlertKind, NotificationText};
use crate::error::{ReportError, RpmError};

use super::state::Observables;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Actuators were put in their boot state and the loop is about to run.
    Started(Observables),

    /// An alert latched active.  Emitted exactly once per crossing.
    Notification {
        kind: AlertKind,
        message: NotificationText,
    },

    /// An alert returned to inactive.
    AlertCleared(AlertKind),

    /// The LED output changed level.
    LedChanged(bool),

    /// A remote `setRPM` call was accepted.
    RpmChanged { from: u8, to: u8 },

    /// A remote `setRPM` call was rejected.
    RpmRejected(RpmError),

    /// A report POST completed (any status).
    ReportSent {
        status: u16,
        body: heapless::String<64>,
    },

    /// A report POST failed at the transport level.
    ReportFailed(ReportError),
}
