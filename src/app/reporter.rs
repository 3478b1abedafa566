//! Rate-limited cloud reporting.
//!
//! At most one form-encoded POST per `report_interval_ms`.  The payload is
//! a fixed four-field record:
//!
//! ```text
//! api_key=<key>&field1=<temp °C>&field2=<volts>&field3=<rpm>&field4=<0|1>
//! ```
//!
//! Floats are rendered with two decimals; `field4` is `1` while either alert
//! is latched.  The timer advances on every attempt, so a failed POST is not
//! retried before the next interval.

use core::fmt::Write;

use crate::config::SystemConfig;

use super::state::Observables;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Capacity of a rendered form body.
pub const BODY_CAPACITY: usize = 192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub host: heapless::String<64>,
    pub port: u16,
    pub path: heapless::String<32>,
    pub content_type: &'static str,
    pub body: heapless::String<BODY_CAPACITY>,
}

impl ReportRequest {
    /// `http://host:port/path`.
    pub fn url(&self) -> heapless::String<128> {
        let mut url = heapless::String::new();
        let _ = write!(url, "http://{}:{}{}", self.host, self.port, self.path);
        url
    }
}

/// Status line and (truncated) body of the endpoint's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub status: u16,
    pub body: heapless::String<64>,
}

impl ReportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct RateLimitedReporter {
    interval_ms: u64,
    last_report_ms: u64,
    host: heapless::String<64>,
    port: u16,
    path: heapless::String<32>,
    api_key: heapless::String<32>,
}

impl RateLimitedReporter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            interval_ms: u64::from(config.report_interval_ms),
            last_report_ms: 0,
            host: config.report_host.clone(),
            port: config.report_port,
            path: config.report_path.clone(),
            api_key: config.report_api_key.clone(),
        }
    }

    /// Strictly more than one interval since the last attempt.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_report_ms) > self.interval_ms
    }

    pub fn mark_sent(&mut self, now_ms: u64) {
        self.last_report_ms = now_ms;
    }

    pub fn last_report_ms(&self) -> u64 {
        self.last_report_ms
    }

    pub fn build_request(&self, obs: &Observables) -> ReportRequest {
        ReportRequest {
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            content_type: FORM_CONTENT_TYPE,
            body: form_body(&self.api_key, obs),
        }
    }
}

/// Render the four-field form body.
pub fn form_body(api_key: &str, obs: &Observables) -> heapless::String<BODY_CAPACITY> {
    let mut body = heapless::String::new();
    let _ = body.push_str("api_key=");
    push_form_value(&mut body, api_key);
    let _ = write!(
        body,
        "&field1={:.2}&field2={:.2}&field3={}&field4={}",
        obs.temperature_c,
        obs.voltage_v,
        obs.rpm,
        u8::from(obs.any_alert()),
    );
    body
}

/// Append `value` percent-encoded per `application/x-www-form-urlencoded`.
fn push_form_value<const N: usize>(out: &mut heapless::String<N>, value: &str) {
    for b in value.bytes() {
        let _ = match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(b as char).is_ok()
            }
            b' ' => out.push('+').is_ok(),
            _ => write!(out, "%{b:02X}").is_ok(),
        };
    }
}
