//! Active-low push-button input and its press guard.
//!
//! ## Hardware
//!
//! Momentary switch to GND with the internal pull-up enabled, so a LOW
//! level means pressed.  The pin is only sampled from the control loop.
//!
//! ## Debounce
//!
//! After an accepted press, further presses are ignored until
//! `accepted_at + debounce_ms`.  The guard is a timestamp comparison, so the
//! loop keeps polling sensors and reporting while it is armed.  A held
//! button is accepted again on the first sample after the guard expires.

use embedded_hal::digital::InputPin;

use crate::error::SensorError;

pub struct ButtonDriver<P> {
    pin: P,
}

impl<P: InputPin> ButtonDriver<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// `true` while the button is held (pin reads LOW).
    pub fn is_pressed(&mut self) -> Result<bool, SensorError> {
        self.pin.is_low().map_err(|_| SensorError::GpioReadFailed)
    }
}

/// Timestamp guard that ignores input until a deadline.
#[derive(Debug, Clone, Copy)]
pub struct PressGuard {
    debounce_ms: u64,
    ignore_until_ms: Option<u64>,
}

impl PressGuard {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms: debounce_ms as u64,
            ignore_until_ms: None,
        }
    }

    /// Offer a press sampled at `now_ms`.  Returns `true` if accepted, and
    /// arms the guard.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(until) = self.ignore_until_ms {
            if now_ms < until {
                return false;
            }
        }
        self.ignore_until_ms = Some(now_ms.saturating_add(self.debounce_ms));
        true
    }

    pub fn is_armed(&self, now_ms: u64) -> bool {
        self.ignore_until_ms.is_some_and(|until| now_ms < until)
    }
}
