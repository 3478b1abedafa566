//! System configuration parameters
//!
//! All tunable parameters for the SensorWatch firmware.  Values are fixed
//! per build; secrets (API key, WiFi credentials, remote PSK) are injected
//! by `build.rs` from the build environment.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_API_KEY: &str = match option_env!("THINGSPEAK_API_KEY") {
    Some(key) => key,
    None => "CHANGE-ME",
};

/// WiFi station SSID baked in at build time (empty if unset).
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};

/// WiFi station password baked in at build time (empty for open networks).
pub const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(pass) => pass,
    None => "",
};

/// Pre-shared key for the remote session handshake.  Empty disables the
/// remote listener.
pub const REMOTE_PSK: &str = match option_env!("REMOTE_PSK") {
    Some(psk) => psk,
    None => "",
};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Thresholds ---
    /// Temperature alert threshold (°C), strict `>` to raise
    pub temp_threshold_c: f32,
    /// Voltage alert threshold (V), strict `>` to raise
    pub voltage_threshold_v: f32,

    // --- ADC / sensor scaling ---
    /// ADC full-scale input voltage
    pub adc_full_scale_v: f32,
    /// Largest raw sample for the ADC bit depth (4095 for 12-bit)
    pub adc_max_sample: u16,
    /// TMP36 output at 0 °C (V)
    pub tmp36_offset_v: f32,
    /// TMP36 scale (°C per V)
    pub tmp36_scale_c_per_v: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Button is ignored for this long after an accepted press (milliseconds).
    /// The button is sampled once per tick, so the guard only rejects a
    /// press when this exceeds the spacing between ticks.
    pub button_debounce_ms: u32,
    /// Minimum gap between two reports (milliseconds)
    pub report_interval_ms: u32,

    // --- Reporting endpoint ---
    pub report_host: heapless::String<64>,
    pub report_port: u16,
    pub report_path: heapless::String<32>,
    pub report_api_key: heapless::String<32>,

    // --- Remote command surface ---
    /// TCP port the remote command listener binds to
    pub remote_port: u16,
    /// Token-bucket refill rate for remote requests (per second)
    pub remote_rate_per_sec: u32,
    /// Token-bucket burst capacity for remote requests
    pub remote_burst: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            temp_threshold_c: 23.0,
            voltage_threshold_v: 3.0,

            // 12-bit ADC, 3.3 V reference, TMP36 sensor
            adc_full_scale_v: 3.3,
            adc_max_sample: 4095,
            tmp36_offset_v: 0.5,
            tmp36_scale_c_per_v: 100.0,

            // Timing
            control_loop_interval_ms: 1000,
            button_debounce_ms: 200,
            report_interval_ms: 15_000, // ThingSpeak free tier: one update per 15 s

            // Endpoint
            report_host: fixed_str("api.thingspeak.com"),
            report_port: 80,
            report_path: fixed_str("/update"),
            report_api_key: fixed_str(DEFAULT_API_KEY),

            // Remote
            remote_port: 7070,
            remote_rate_per_sec: 10,
            remote_burst: 10,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Called once at boot before the service is
    /// constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adc_full_scale_v.is_nan() || self.adc_full_scale_v <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "adc_full_scale_v must be positive",
            ));
        }
        if self.adc_max_sample == 0 {
            return Err(ConfigError::ValidationFailed(
                "adc_max_sample must be non-zero",
            ));
        }
        if !self.temp_threshold_c.is_finite() || !self.voltage_threshold_v.is_finite() {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be non-zero",
            ));
        }
        if self.report_interval_ms < self.control_loop_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "report_interval_ms must be at least one loop interval",
            ));
        }
        if self.report_host.is_empty() || !self.report_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed(
                "report endpoint needs a host and an absolute path",
            ));
        }
        if self.remote_rate_per_sec == 0 || self.remote_burst == 0 {
            return Err(ConfigError::ValidationFailed(
                "remote rate limit must allow at least one request",
            ));
        }
        Ok(())
    }
}

/// Build a fixed-capacity string, truncating at a char boundary if needed.
fn fixed_str<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
