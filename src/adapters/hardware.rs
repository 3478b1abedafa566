//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  The pin types are
//! generic over `embedded-hal` traits: `esp-idf-hal` drivers on the device,
//! in-memory fakes on the host.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::app::state::SensorSnapshot;
use crate::drivers::button::ButtonDriver;
use crate::drivers::led::IndicatorLed;
use crate::drivers::motor::MotorDriver;
use crate::error::ActuatorError;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<L, M, B> {
    sensor_hub: SensorHub,
    led: IndicatorLed<L>,
    motor: MotorDriver<M>,
    button: ButtonDriver<B>,
}

impl<L, M, B> HardwareAdapter<L, M, B>
where
    L: OutputPin,
    M: SetDutyCycle,
    B: InputPin,
{
    pub fn new(
        sensor_hub: SensorHub,
        led: IndicatorLed<L>,
        motor: MotorDriver<M>,
        button: ButtonDriver<B>,
    ) -> Self {
        Self {
            sensor_hub,
            led,
            motor,
            button,
        }
    }

    pub fn led_is_on(&self) -> bool {
        self.led.is_on()
    }

    pub fn motor_rpm(&self) -> u8 {
        self.motor.rpm()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<L, M, B> SensorPort for HardwareAdapter<L, M, B>
where
    L: OutputPin,
    M: SetDutyCycle,
    B: InputPin,
{
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }

    fn button_pressed(&mut self) -> bool {
        self.button.is_pressed().unwrap_or_else(|e| {
            warn!("button: {e}");
            false
        })
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<L, M, B> ActuatorPort for HardwareAdapter<L, M, B>
where
    L: OutputPin,
    M: SetDutyCycle,
    B: InputPin,
{
    fn set_led(&mut self, on: bool) {
        if let Err(e) = self.led.set(on) {
            warn!("led: {e}");
        }
    }

    fn set_motor_rpm(&mut self, rpm: u8) -> Result<(), ActuatorError> {
        self.motor.set_rpm(rpm).inspect_err(|e| warn!("motor: {e}"))
    }

    fn all_off(&mut self) {
        if let Err(e) = self.motor.stop() {
            warn!("motor: {e}");
        }
        if let Err(e) = self.led.off() {
            warn!("led: {e}");
        }
    }
}
