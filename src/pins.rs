//! GPIO / peripheral pin assignments for the SensorWatch board (ESP32-S3).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  `main.rs` takes the matching `Peripherals` fields
//! and refuses to boot if one disagrees with the numbers here.

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// TMP36 temperature sensor: ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 0;
/// Potentiometer / voltage tap: ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const VOLTAGE_ADC_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Alert LED, active HIGH.
pub const LED_GPIO: i32 = 4;
/// Motor driver PWM input (LEDC channel 0).
pub const MOTOR_PWM_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the motor (25 kHz: inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
