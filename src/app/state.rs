//! Device state owned by the application service.
//!
//! Everything the control loop mutates lives in [`DeviceState`].  It is
//! zero-initialised at boot, owned by [`AppService`](super::service::AppService),
//! and never persisted.

use serde::{Deserialize, Serialize};

use crate::alert::{AlertKind, AlertMonitor};
use crate::config::SystemConfig;

/// One tick's worth of converted sensor readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub temp_raw: u16,
    pub voltage_raw: u16,
    pub temperature_c: f32,
    pub voltage_v: f32,
}

#[derive(Debug, Clone)]
pub struct DeviceState {
    /// Last converted readings, overwritten every tick.
    pub sensors: SensorSnapshot,
    pub temp_alert: AlertMonitor,
    pub voltage_alert: AlertMonitor,
    /// Last accepted motor command.  Only `setRPM` mutates this.
    pub motor_rpm: u8,
    /// Level last written to the LED pin.
    pub led_on: bool,
}

impl DeviceState {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sensors: SensorSnapshot::default(),
            temp_alert: AlertMonitor::new(AlertKind::Temperature, config.temp_threshold_c),
            voltage_alert: AlertMonitor::new(AlertKind::Voltage, config.voltage_threshold_v),
            motor_rpm: 0,
            led_on: false,
        }
    }

    pub fn temp_alert_active(&self) -> bool {
        self.temp_alert.is_active()
    }

    pub fn voltage_alert_active(&self) -> bool {
        self.voltage_alert.is_active()
    }

    pub fn observables(&self) -> Observables {
        Observables {
            temperature_c: self.sensors.temperature_c,
            voltage_v: self.sensors.voltage_v,
            rpm: self.motor_rpm,
            temp_alert_active: self.temp_alert_active(),
            voltage_alert_active: self.voltage_alert_active(),
            led_on: self.led_on,
        }
    }
}

/// Read-only view exposed to the remote engine and the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observables {
    pub temperature_c: f32,
    pub voltage_v: f32,
    pub rpm: u8,
    pub temp_alert_active: bool,
    pub voltage_alert_active: bool,
    pub led_on: bool,
}

impl Observables {
    /// `true` if either alert is latched.
    pub fn any_alert(&self) -> bool {
        self.temp_alert_active || self.voltage_alert_active
    }
}
