//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the device state, both alert monitors, the button
//! guard and the report timer.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │ ──▶ ReportPort
//! ActuatorPort ◀──│ Alerts · Button · RPM   │
//!                 └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::alert::{AlertKind, AlertTransition};
use crate::config::SystemConfig;
use crate::drivers::button::PressGuard;
use crate::error::RpmError;

use super::commands::{AppCommand, parse_permissive_int};
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, ReportPort, SensorPort};
use super::reporter::RateLimitedReporter;
use super::state::{DeviceState, Observables};

/// Result code returned to a remote caller on an accepted `setRPM`.
pub const RPM_ACCEPTED: i32 = 1;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    state: DeviceState,
    guard: PressGuard,
    reporter: RateLimitedReporter,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let state = DeviceState::new(&config);
        let guard = PressGuard::new(config.button_debounce_ms);
        let reporter = RateLimitedReporter::new(&config);
        Self {
            config,
            state,
            guard,
            reporter,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put actuators in their boot state (motor 0, LED low).
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.state.motor_rpm = 0;
        self.state.led_on = false;
        sink.emit(&AppEvent::Started(self.observables()));
        info!(
            "AppService started (temp > {:.1} C, voltage > {:.2} V)",
            self.config.temp_threshold_c, self.config.voltage_threshold_v
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: read sensors → alerts → button → report.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        net: &mut impl ReportPort,
    ) {
        self.tick_count += 1;

        // 1. Read sensors via SensorPort
        self.state.sensors = hw.read_all();
        debug!(
            "tick {}: {:.2} C ({}), {:.3} V ({})",
            self.tick_count,
            self.state.sensors.temperature_c,
            self.state.sensors.temp_raw,
            self.state.sensors.voltage_v,
            self.state.sensors.voltage_raw,
        );

        // 2. Alert state machines
        self.evaluate_alerts(hw, sink);

        // 3. Button, only while the temperature alert is latched
        if self.state.temp_alert_active() && hw.button_pressed() && self.guard.accept(now_ms) {
            self.drive_led(true, hw, sink);
        }

        // 4. Rate-limited report
        self.maybe_report(now_ms, sink, net);
    }

    fn evaluate_alerts(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let temp = self.state.sensors.temperature_c;
        let t = self.state.temp_alert.evaluate(temp);
        publish_transition(self.state.temp_alert.kind(), t, temp, sink);
        if !t.is_active() {
            self.drive_led(false, hw, sink);
        }

        let volts = self.state.sensors.voltage_v;
        let v = self.state.voltage_alert.evaluate(volts);
        publish_transition(self.state.voltage_alert.kind(), v, volts, sink);
    }

    /// Write the LED every time; report only level changes.
    fn drive_led(&mut self, on: bool, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.set_led(on);
        if self.state.led_on != on {
            self.state.led_on = on;
            sink.emit(&AppEvent::LedChanged(on));
        }
    }

    fn maybe_report(&mut self, now_ms: u64, sink: &mut impl EventSink, net: &mut impl ReportPort) {
        if !self.reporter.is_due(now_ms) {
            return;
        }
        let request = self.reporter.build_request(&self.observables());
        match net.post_form(&request) {
            Ok(resp) => {
                if resp.is_success() {
                    info!("report: status={} body={}", resp.status, resp.body);
                } else {
                    warn!("report: status={} body={}", resp.status, resp.body);
                }
                sink.emit(&AppEvent::ReportSent {
                    status: resp.status,
                    body: resp.body,
                });
            }
            Err(e) => {
                warn!("report: {e}");
                sink.emit(&AppEvent::ReportFailed(e));
            }
        }
        self.reporter.mark_sent(now_ms);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Returns the remote result code.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> i32 {
        match cmd {
            AppCommand::SetRpm(arg) => self.set_motor_rpm(&arg, hw, sink),
        }
    }

    /// Remote `setRPM`: `1` on success, `-1` if the voltage alert is not
    /// active, `-2` if the parsed value is outside `0..=255`, `-3` if the
    /// PWM write failed.  Only a successful write changes the stored speed.
    pub fn set_motor_rpm(
        &mut self,
        arg: &str,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> i32 {
        match self.try_set_motor_rpm(arg, hw) {
            Ok(from) => {
                let to = self.state.motor_rpm;
                info!("setRPM({arg:?}): {from} -> {to}");
                sink.emit(&AppEvent::RpmChanged { from, to });
                RPM_ACCEPTED
            }
            Err(e) => {
                warn!("setRPM({arg:?}) rejected: {e}");
                sink.emit(&AppEvent::RpmRejected(e));
                e.code()
            }
        }
    }

    /// Returns the previous speed on success.
    fn try_set_motor_rpm(&mut self, arg: &str, hw: &mut impl ActuatorPort) -> Result<u8, RpmError> {
        if !self.state.voltage_alert_active() {
            return Err(RpmError::VoltageNotAlerted);
        }
        let rpm = u8::try_from(parse_permissive_int(arg)).map_err(|_| RpmError::OutOfRange)?;
        let from = self.state.motor_rpm;
        hw.set_motor_rpm(rpm).map_err(|_| RpmError::ActuatorFailed)?;
        self.state.motor_rpm = rpm;
        Ok(from)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn observables(&self) -> Observables {
        self.state.observables()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Clock value at the last report attempt (0 before the first).
    pub fn last_report_ms(&self) -> u64 {
        self.reporter.last_report_ms()
    }
}

fn publish_transition(
    kind: AlertKind,
    transition: AlertTransition,
    value: f32,
    sink: &mut impl EventSink,
) {
    match transition {
        AlertTransition::Raised => sink.emit(&AppEvent::Notification {
            kind,
            message: kind.message(value),
        }),
        AlertTransition::Cleared => sink.emit(&AppEvent::AlertCleared(kind)),
        AlertTransition::StillActive | AlertTransition::StillInactive => {}
    }
}
