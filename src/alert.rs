//! Threshold alert monitors.
//!
//! Each monitored quantity owns one [`AlertMonitor`]: a latched two-state
//! machine with no hysteresis.
//!
//! ## Alert lifecycle
//!
//! 1. The reading rises strictly above the threshold while `Inactive`:
//!    the monitor latches `Active` and reports [`AlertTransition::Raised`]
//!    exactly once.  The caller publishes the notification.
//! 2. Further readings above the threshold report `StillActive`; no
//!    duplicate notification is produced.
//! 3. A reading at or below the threshold reports `Cleared` (from
//!    `Active`) or `StillInactive`.  Neither produces a notification.

use core::fmt::Write;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Which quantity a monitor watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Temperature,
    Voltage,
}

impl AlertKind {
    /// Name of the outbound notification event.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Temperature => "temp_alert",
            Self::Voltage => "voltage_alert",
        }
    }

    /// Human-readable notification text for a reading.
    pub fn message(self, value: f32) -> NotificationText {
        let mut text = NotificationText::new();
        let _ = match self {
            Self::Temperature => write!(text, "High temperature: {value:.1}\u{00b0}C"),
            Self::Voltage => write!(text, "High voltage: {value:.2}V"),
        };
        text
    }
}

/// Fixed-capacity notification payload.
pub type NotificationText = heapless::String<48>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Inactive,
    Active,
}

/// Result of feeding one reading into a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// `Inactive → Active`; publish a notification.
    Raised,
    /// `Active → Inactive`.
    Cleared,
    StillActive,
    StillInactive,
}

impl AlertTransition {
    /// Whether the monitor is latched active after this transition.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Raised | Self::StillActive)
    }
}

#[derive(Debug, Clone)]
pub struct AlertMonitor {
    kind: AlertKind,
    threshold: f32,
    state: AlertState,
}

impl AlertMonitor {
    pub fn new(kind: AlertKind, threshold: f32) -> Self {
        Self {
            kind,
            threshold,
            state: AlertState::Inactive,
        }
    }

    /// Feed one reading.  Raises on strict `>`, clears on `<=`.
    pub fn evaluate(&mut self, value: f32) -> AlertTransition {
        let above = value > self.threshold;
        match (self.state, above) {
            (AlertState::Inactive, true) => {
                self.state = AlertState::Active;
                warn!("ALERT RAISED: {:?} {value:.2} > {:.2}", self.kind, self.threshold);
                AlertTransition::Raised
            }
            (AlertState::Active, true) => AlertTransition::StillActive,
            (AlertState::Active, false) => {
                self.state = AlertState::Inactive;
                info!("ALERT CLEARED: {:?} {value:.2} <= {:.2}", self.kind, self.threshold);
                AlertTransition::Cleared
            }
            (AlertState::Inactive, false) => AlertTransition::StillInactive,
        }
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AlertState::Active
    }
}
