//! Sensor subsystem: analog conversions and the aggregating [`SensorHub`].
//!
//! The hub samples both ADC channels each tick and produces a
//! [`SensorSnapshot`] for the application service.

pub mod temperature;
pub mod voltage;

use log::warn;

use crate::app::state::SensorSnapshot;
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::pins;
use temperature::TemperatureSensor;
use voltage::VoltageSensor;

/// Linear ADC transfer function: `volts = raw / max_sample * full_scale_v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScale {
    pub full_scale_v: f32,
    pub max_sample: u16,
}

impl AdcScale {
    pub const fn new(full_scale_v: f32, max_sample: u16) -> Self {
        Self {
            full_scale_v,
            max_sample,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.adc_full_scale_v, config.adc_max_sample)
    }

    /// Fraction of full scale (not clamped; samples above `max_sample`
    /// simply read above 1.0).
    pub fn fraction(&self, raw: u16) -> f32 {
        raw as f32 / self.max_sample as f32
    }

    pub fn volts(&self, raw: u16) -> f32 {
        self.fraction(raw) * self.full_scale_v
    }
}

/// Owns both analog sensors and the last good raw samples.
pub struct SensorHub {
    pub temperature: TemperatureSensor,
    pub voltage: VoltageSensor,
    last_temp_raw: u16,
    last_voltage_raw: u16,
}

impl SensorHub {
    pub fn new(config: &SystemConfig) -> Self {
        let scale = AdcScale::from_config(config);
        Self {
            temperature: TemperatureSensor::new(
                scale,
                config.tmp36_offset_v,
                config.tmp36_scale_c_per_v,
            ),
            voltage: VoltageSensor::new(scale),
            last_temp_raw: 0,
            last_voltage_raw: 0,
        }
    }

    /// Sample both channels and convert.
    ///
    /// A failed ADC read keeps the previous raw sample; a single bad
    /// conversion must not stall the control loop.
    pub fn read_all(&mut self) -> SensorSnapshot {
        match hw_init::adc1_read(pins::TEMP_ADC_CHANNEL) {
            Ok(raw) => self.last_temp_raw = raw,
            Err(e) => warn!("temperature channel: {e}, keeping last sample"),
        }
        match hw_init::adc1_read(pins::VOLTAGE_ADC_CHANNEL) {
            Ok(raw) => self.last_voltage_raw = raw,
            Err(e) => warn!("voltage channel: {e}, keeping last sample"),
        }
        self.snapshot_from_raw(self.last_temp_raw, self.last_voltage_raw)
    }

    /// Convert a pair of raw samples without touching the ADC.
    pub fn snapshot_from_raw(&self, temp_raw: u16, voltage_raw: u16) -> SensorSnapshot {
        let t = self.temperature.convert(temp_raw);
        let v = self.voltage.convert(voltage_raw);
        SensorSnapshot {
            temp_raw: t.raw,
            voltage_raw: v.raw,
            temperature_c: t.celsius,
            voltage_v: v.volts,
        }
    }
}
