//! Single indicator LED on a digital output.
//!
//! Generic over [`OutputPin`]; on ESP-IDF this is a `PinDriver<Output>`.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct IndicatorLed<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> IndicatorLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
