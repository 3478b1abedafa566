//! Mock adapters for integration tests.
//!
//! Records every actuator call and outbound report so tests can assert on
//! the full command history without touching real GPIO/PWM/HTTP.

use std::cell::Cell;
use std::convert::Infallible;

use sensorwatch::app::events::AppEvent;
use sensorwatch::app::ports::{ActuatorPort, ClockPort, EventSink, ReportPort, SensorPort};
use sensorwatch::app::reporter::{ReportRequest, ReportResponse};
use sensorwatch::app::state::SensorSnapshot;
use sensorwatch::error::{ActuatorError, ReportError};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetLed(bool),
    SetMotor(u8),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub snapshot: SensorSnapshot,
    pub button_held: bool,
    pub button_reads: u32,
    /// When set, motor writes fail and are not recorded.
    pub motor_fault: bool,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot::default(),
            button_held: false,
            button_reads: 0,
            motor_fault: false,
            calls: Vec::new(),
        }
    }

    /// Set the converted readings the next `read_all` returns.
    pub fn set_readings(&mut self, temperature_c: f32, voltage_v: f32) {
        self.snapshot = SensorSnapshot {
            temp_raw: 0,
            voltage_raw: 0,
            temperature_c,
            voltage_v,
        };
    }

    /// Level of the LED after the last LED-affecting call.
    pub fn led_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetLed(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::SetMotor(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn motor_rpm(&self) -> u8 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetMotor(rpm) => Some(*rpm),
                ActuatorCall::AllOff => Some(0),
                ActuatorCall::SetLed(_) => None,
            })
            .unwrap_or(0)
    }

    pub fn motor_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::SetMotor(_)))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }

    fn button_pressed(&mut self) -> bool {
        self.button_reads += 1;
        self.button_held
    }
}

impl ActuatorPort for MockHardware {
    fn set_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetLed(on));
    }

    fn set_motor_rpm(&mut self, rpm: u8) -> Result<(), ActuatorError> {
        if self.motor_fault {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.calls.push(ActuatorCall::SetMotor(rpm));
        Ok(())
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Outbound notifications as `(event name, message)`.
    pub fn notifications(&self) -> Vec<(&'static str, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Notification { kind, message } => {
                    Some((kind.event_name(), message.as_str().to_owned()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockReporter ──────────────────────────────────────────────

pub struct MockReporter {
    pub requests: Vec<ReportRequest>,
    pub fail_with: Option<ReportError>,
    pub status: u16,
}

#[allow(dead_code)]
impl MockReporter {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            fail_with: None,
            status: 200,
        }
    }

    pub fn failing(err: ReportError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new()
        }
    }

    pub fn last_body(&self) -> Option<&str> {
        self.requests.last().map(|r| r.body.as_str())
    }
}

impl ReportPort for MockReporter {
    fn post_form(&mut self, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        self.requests.push(request.clone());
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        let mut body = heapless::String::new();
        let _ = body.push_str("42");
        Ok(ReportResponse {
            status: self.status,
            body,
        })
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) -> u64 {
        self.now.set(self.now.get() + ms);
        self.now.get()
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── embedded-hal pin fakes ────────────────────────────────────

/// Output pin / PWM channel that records its last level.
#[derive(Default)]
pub struct FakeOutput {
    pub high: bool,
}

impl embedded_hal::digital::ErrorType for FakeOutput {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

pub struct FakePwm {
    pub duty: u16,
}

impl embedded_hal::pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }
    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty = duty;
        Ok(())
    }
}

/// Button input; `level_high == false` means pressed.
pub struct FakeButton {
    pub level_high: bool,
}

impl embedded_hal::digital::ErrorType for FakeButton {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for FakeButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level_high)
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level_high)
    }
}
