//! Potentiometer voltage tap: the ADC reading scaled straight to volts.

use super::AdcScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageReading {
    pub raw: u16,
    pub volts: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct VoltageSensor {
    scale: AdcScale,
}

impl VoltageSensor {
    pub fn new(scale: AdcScale) -> Self {
        Self { scale }
    }

    pub fn convert(&self, raw: u16) -> VoltageReading {
        VoltageReading {
            raw,
            volts: self.compute_voltage(raw),
        }
    }

    pub fn compute_voltage(&self, raw: u16) -> f32 {
        self.scale.volts(raw)
    }
}
