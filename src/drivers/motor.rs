//! DC motor speed control via one PWM channel.
//!
//! The commanded speed is an 8-bit "RPM" value (0..=255) mapped linearly
//! onto the PWM duty cycle: 0 is stopped, 255 is full on.
//!
//! ## Dual-target design
//!
//! Generic over [`SetDutyCycle`]: on ESP-IDF this is an `LedcDriver`
//! (8-bit resolution, see [`crate::pins`]); tests pass a recording mock.
//!
//! The driver is a dumb actuator.  Whether a speed change is permitted is
//! decided by the application service.

use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

/// Full-scale speed command.
pub const MAX_RPM: u8 = u8::MAX;

pub struct MotorDriver<P> {
    pwm: P,
    rpm: u8,
}

impl<P: SetDutyCycle> MotorDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, rpm: 0 }
    }

    /// Drive the channel at `rpm / 255` duty.
    pub fn set_rpm(&mut self, rpm: u8) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(rpm), u16::from(MAX_RPM))
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.rpm = rpm;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set_rpm(0)
    }

    /// Last speed successfully written to the channel.
    pub fn rpm(&self) -> u8 {
        self.rpm
    }
}
