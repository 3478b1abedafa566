//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Alert notifications go out under their event name (`temp_alert`,
//! `voltage_alert`) so a log forwarder can relay them verbatim.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(obs) => {
                info!(
                    "START | rpm={} led={} | T={:.1}\u{00b0}C V={:.2}V",
                    obs.rpm,
                    if obs.led_on { "ON" } else { "OFF" },
                    obs.temperature_c,
                    obs.voltage_v,
                );
            }
            AppEvent::Notification { kind, message } => {
                warn!("ALERT | {} | {}", kind.event_name(), message);
            }
            AppEvent::AlertCleared(kind) => {
                info!("ALERT | {} | cleared", kind.event_name());
            }
            AppEvent::LedChanged(on) => {
                info!("LED | {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::RpmChanged { from, to } => {
                info!("RPM | {from} -> {to}");
            }
            AppEvent::RpmRejected(e) => {
                info!("RPM | rejected ({}) code={}", e, e.code());
            }
            AppEvent::ReportSent { status, body } => {
                info!("REPORT | status={status} | body={body}");
            }
            AppEvent::ReportFailed(e) => {
                warn!("REPORT | failed: {e}");
            }
        }
    }
}
