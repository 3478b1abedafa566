//! Integration tests for the AppService → alerts → actuators/report pipeline.
//!
//! These run on the host (x86_64) against mock adapters and drive the
//! service one tick at a time with explicit timestamps.

use super::mock_hw::{ActuatorCall, ManualClock, MockHardware, MockReporter, RecordingSink};

use sensorwatch::alert::AlertKind;
use sensorwatch::app::commands::AppCommand;
use sensorwatch::app::events::AppEvent;
use sensorwatch::app::ports::ClockPort;
use sensorwatch::app::service::AppService;
use sensorwatch::config::SystemConfig;
use sensorwatch::error::{ReportError, RpmError};

const COOL: f32 = 20.0;
const HOT: f32 = 30.0;
const LOW_V: f32 = 1.0;
const HIGH_V: f32 = 3.2;

fn make_app() -> (AppService, MockHardware, RecordingSink, MockReporter) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink, MockReporter::new())
}

fn tick_with(
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    net: &mut MockReporter,
    now_ms: u64,
    temp: f32,
    volts: f32,
) {
    hw.set_readings(temp, volts);
    app.tick(now_ms, hw, sink, net);
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_stops_motor_and_clears_led() {
    let (app, hw, sink, _) = make_app();
    assert_eq!(hw.calls, vec![ActuatorCall::AllOff]);
    assert!(matches!(sink.events.first(), Some(AppEvent::Started(obs)) if obs.rpm == 0 && !obs.led_on));
    assert_eq!(app.observables().rpm, 0);
    assert_eq!(app.last_report_ms(), 0);
}

// ── Temperature alert ─────────────────────────────────────────

#[test]
fn hot_reading_notifies_once_and_button_lights_led() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    hw.clear_calls();

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000, HOT, LOW_V);
    assert_eq!(
        sink.notifications(),
        vec![("temp_alert", "High temperature: 30.0\u{00b0}C".to_owned())]
    );
    assert!(app.state().temp_alert_active());
    assert!(
        !hw.calls.contains(&ActuatorCall::SetLed(false)),
        "activation tick must not force the LED low"
    );

    hw.button_held = true;
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 2_000, HOT, LOW_V);
    assert!(hw.led_on());
    assert!(app.observables().led_on);
    assert_eq!(sink.notifications().len(), 1, "no duplicate while still hot");
}

#[test]
fn one_notification_per_crossing() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    let temps = [COOL, HOT, HOT, 25.0, COOL, 23.0, 23.1, 40.0];
    for (i, t) in temps.iter().enumerate() {
        tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000 * (i as u64 + 1), *t, LOW_V);
    }
    assert_eq!(sink.notifications().len(), 2);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::AlertCleared(AlertKind::Temperature))),
        1
    );
}

#[test]
fn threshold_reading_does_not_alert() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000, 23.0, 3.0);
    assert!(sink.notifications().is_empty());
    assert!(!app.state().temp_alert_active());
    assert!(!app.state().voltage_alert_active());
}

#[test]
fn de_alert_forces_led_low_even_with_button_held() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    hw.button_held = true;
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000, HOT, LOW_V);
    assert!(hw.led_on());

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 2_000, COOL, LOW_V);
    assert!(!hw.led_on());
    assert!(!app.observables().led_on);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::LedChanged(false))), 1);
}

#[test]
fn button_ignored_while_temperature_normal() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    hw.button_held = true;
    for i in 1..=3 {
        tick_with(&mut app, &mut hw, &mut sink, &mut net, i * 1_000, COOL, LOW_V);
    }
    assert!(!hw.led_on());
    assert_eq!(hw.button_reads, 0, "button is only sampled during a temperature alert");
}

#[test]
fn button_guard_ignores_presses_inside_debounce_window() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    hw.button_held = true;
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000, HOT, LOW_V);
    assert!(hw.led_on());

    // Drop and re-raise the alert inside the 200 ms guard.
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_050, COOL, LOW_V);
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_100, HOT, LOW_V);
    assert!(!hw.led_on(), "press inside the guard window is ignored");

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_200, HOT, LOW_V);
    assert!(hw.led_on());
}

#[test]
fn long_debounce_skips_a_whole_tick() {
    let config = SystemConfig {
        button_debounce_ms: 1_500,
        ..SystemConfig::default()
    };
    let mut app = AppService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut net = MockReporter::new();
    app.start(&mut hw, &mut sink);
    hw.button_held = true;

    for now in [1_000, 2_000, 3_000] {
        tick_with(&mut app, &mut hw, &mut sink, &mut net, now, HOT, LOW_V);
    }
    let presses = hw
        .calls
        .iter()
        .filter(|c| **c == ActuatorCall::SetLed(true))
        .count();
    assert_eq!(presses, 2, "the 2 s press falls inside the 1.5 s guard");
    assert_eq!(hw.button_reads, 3);
}

// ── setRPM ────────────────────────────────────────────────────

fn raise_voltage_alert(
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    net: &mut MockReporter,
) {
    tick_with(app, hw, sink, net, 1_000, COOL, HIGH_V);
    assert!(app.state().voltage_alert_active());
    assert_eq!(
        sink.notifications(),
        vec![("voltage_alert", "High voltage: 3.20V".to_owned())]
    );
}

#[test]
fn set_rpm_accepted_during_voltage_alert() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);

    assert_eq!(app.set_motor_rpm("100", &mut hw, &mut sink), 1);
    assert_eq!(app.observables().rpm, 100);
    assert_eq!(hw.motor_rpm(), 100);
    assert!(sink.events.contains(&AppEvent::RpmChanged { from: 0, to: 100 }));
}

#[test]
fn set_rpm_rejected_without_voltage_alert() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 1_000, COOL, 3.0);
    hw.clear_calls();

    assert_eq!(app.set_motor_rpm("100", &mut hw, &mut sink), -1);
    assert_eq!(app.observables().rpm, 0);
    assert_eq!(hw.motor_writes(), 0);
    assert!(sink.events.contains(&AppEvent::RpmRejected(RpmError::VoltageNotAlerted)));
}

#[test]
fn set_rpm_out_of_range() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);
    assert_eq!(app.set_motor_rpm("50", &mut hw, &mut sink), 1);
    hw.clear_calls();

    for arg in ["999", "-5", "256"] {
        assert_eq!(app.set_motor_rpm(arg, &mut hw, &mut sink), -2, "arg {arg}");
    }
    assert_eq!(app.observables().rpm, 50);
    assert_eq!(hw.motor_writes(), 0);
}

#[test]
fn set_rpm_pwm_failure_keeps_previous_speed() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);
    assert_eq!(app.set_motor_rpm("60", &mut hw, &mut sink), 1);

    hw.motor_fault = true;
    assert_eq!(app.set_motor_rpm("200", &mut hw, &mut sink), -3);
    assert_eq!(app.observables().rpm, 60, "state follows the channel, not the request");
    assert_eq!(hw.motor_rpm(), 60);
    assert!(sink.events.contains(&AppEvent::RpmRejected(RpmError::ActuatorFailed)));

    hw.motor_fault = false;
    assert_eq!(app.set_motor_rpm("200", &mut hw, &mut sink), 1);
    assert!(sink.events.contains(&AppEvent::RpmChanged { from: 60, to: 200 }));
}

#[test]
fn set_rpm_parses_permissively() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);

    assert_eq!(app.set_motor_rpm("255", &mut hw, &mut sink), 1);
    assert_eq!(app.set_motor_rpm("abc", &mut hw, &mut sink), 1);
    assert_eq!(app.observables().rpm, 0);
    assert_eq!(app.set_motor_rpm(" 12x", &mut hw, &mut sink), 1);
    assert_eq!(app.observables().rpm, 12);
}

#[test]
fn rpm_survives_voltage_de_alert() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);
    let cmd = AppCommand::SetRpm(heapless::String::try_from("77").unwrap());
    assert_eq!(app.handle_command(cmd, &mut hw, &mut sink), 1);

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 2_000, COOL, LOW_V);
    assert!(!app.state().voltage_alert_active());
    assert_eq!(app.observables().rpm, 77);
    assert_eq!(app.set_motor_rpm("10", &mut hw, &mut sink), -1);
}

// ── Reporting ─────────────────────────────────────────────────

#[test]
fn report_waits_for_full_interval() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    for now in (1_000..=15_000).step_by(1_000) {
        tick_with(&mut app, &mut hw, &mut sink, &mut net, now, COOL, LOW_V);
    }
    assert!(net.requests.is_empty(), "elapsed == interval is not enough");

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 15_001, COOL, LOW_V);
    assert_eq!(net.requests.len(), 1);
    assert_eq!(app.last_report_ms(), 15_001);

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 30_001, COOL, LOW_V);
    assert_eq!(net.requests.len(), 1);
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 30_002, COOL, LOW_V);
    assert_eq!(net.requests.len(), 2);
}

#[test]
fn report_payload_reflects_state() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    raise_voltage_alert(&mut app, &mut hw, &mut sink, &mut net);
    assert_eq!(app.set_motor_rpm("100", &mut hw, &mut sink), 1);

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 16_000, 21.5, HIGH_V);
    let req = net.requests.last().expect("one report");
    assert_eq!(req.content_type, "application/x-www-form-urlencoded");
    assert_eq!(req.host.as_str(), "api.thingspeak.com");
    assert_eq!(req.path.as_str(), "/update");
    assert!(
        req.body.ends_with("&field1=21.50&field2=3.20&field3=100&field4=1"),
        "body was {}",
        req.body
    );
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::ReportSent { status: 200, .. })));
}

#[test]
fn failed_report_still_advances_timer() {
    let (mut app, mut hw, mut sink, _) = make_app();
    let mut net = MockReporter::failing(ReportError::ConnectFailed);

    tick_with(&mut app, &mut hw, &mut sink, &mut net, 20_000, COOL, LOW_V);
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 21_000, COOL, LOW_V);
    assert_eq!(net.requests.len(), 1, "no retry before the next interval");
    assert_eq!(app.last_report_ms(), 20_000);
    assert!(sink.events.contains(&AppEvent::ReportFailed(ReportError::ConnectFailed)));
}

#[test]
fn non_2xx_status_is_logged_not_retried() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    net.status = 500;
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 20_000, COOL, LOW_V);
    tick_with(&mut app, &mut hw, &mut sink, &mut net, 21_000, COOL, LOW_V);
    assert_eq!(net.requests.len(), 1);
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::ReportSent { status: 500, .. })));
}

#[test]
fn clock_driven_loop_reports_on_schedule() {
    let (mut app, mut hw, mut sink, mut net) = make_app();
    let clock = ManualClock::new(0);
    hw.set_readings(COOL, LOW_V);
    for _ in 0..40 {
        let now = clock.advance(1_000);
        app.tick(now, &mut hw, &mut sink, &mut net);
    }
    assert_eq!(clock.now_ms(), 40_000);
    assert_eq!(app.tick_count(), 40);
    // 16 s and 32 s: each strictly more than 15 s after the previous attempt.
    assert_eq!(net.requests.len(), 2);
    assert_eq!(app.last_report_ms(), 32_000);
    assert_eq!(
        net.last_body(),
        Some("api_key=CHANGE-ME&field1=20.00&field2=1.00&field3=0&field4=0")
    );
}
