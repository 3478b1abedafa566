//! TMP36 analog temperature sensor.
//!
//! Output is linear: 0.5 V at 0 °C, 10 mV/°C.  The raw ADC sample is
//! first scaled to volts, then offset and scaled to Celsius.  There is no
//! range check; a floating input simply reads as an implausible temperature.

use super::AdcScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureSensor {
    scale: AdcScale,
    offset_v: f32,
    c_per_v: f32,
}

impl TemperatureSensor {
    pub fn new(scale: AdcScale, offset_v: f32, c_per_v: f32) -> Self {
        Self {
            scale,
            offset_v,
            c_per_v,
        }
    }

    pub fn convert(&self, raw: u16) -> TemperatureReading {
        TemperatureReading {
            raw,
            celsius: self.compute_temperature(raw),
        }
    }

    /// `(raw / max * full_scale - offset) * scale`
    pub fn compute_temperature(&self, raw: u16) -> f32 {
        (self.scale.volts(raw) - self.offset_v) * self.c_per_v
    }
}
