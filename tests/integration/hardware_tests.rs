//! HardwareAdapter over embedded-hal fakes and the simulated ADC.
//!
//! The simulated ADC is process-global; only this module writes it.

use super::mock_hw::{FakeButton, FakeOutput, FakePwm, MockReporter, RecordingSink};

use sensorwatch::adapters::hardware::HardwareAdapter;
use sensorwatch::app::ports::SensorPort;
use sensorwatch::app::service::AppService;
use sensorwatch::config::SystemConfig;
use sensorwatch::drivers::button::ButtonDriver;
use sensorwatch::drivers::hw_init::sim_set_adc;
use sensorwatch::pins::{TEMP_ADC_CHANNEL, VOLTAGE_ADC_CHANNEL};
use sensorwatch::drivers::led::IndicatorLed;
use sensorwatch::drivers::motor::MotorDriver;
use sensorwatch::sensors::SensorHub;

#[test]
fn raw_samples_drive_alerts_led_and_motor() {
    let config = SystemConfig::default();
    let mut hw = HardwareAdapter::new(
        SensorHub::new(&config),
        IndicatorLed::new(FakeOutput::default()),
        MotorDriver::new(FakePwm { duty: 0 }),
        ButtonDriver::new(FakeButton { level_high: false }),
    );
    let mut app = AppService::new(config);
    let mut sink = RecordingSink::new();
    let mut net = MockReporter::new();
    app.start(&mut hw, &mut sink);

    // ~30 °C and full-scale 3.3 V.
    sim_set_adc(TEMP_ADC_CHANNEL, 993);
    sim_set_adc(VOLTAGE_ADC_CHANNEL, 4095);
    let snap = hw.read_all();
    assert!((snap.temperature_c - 30.0).abs() < 0.1);

    app.tick(1_000, &mut hw, &mut sink, &mut net);
    assert!(app.state().temp_alert_active());
    assert!(app.state().voltage_alert_active());
    assert!(hw.led_is_on(), "held button lights the LED during a temperature alert");

    assert_eq!(app.set_motor_rpm("128", &mut hw, &mut sink), 1);
    assert_eq!(hw.motor_rpm(), 128);

    // Back to ~20 °C: LED forced low, motor untouched.
    sim_set_adc(TEMP_ADC_CHANNEL, 869);
    sim_set_adc(VOLTAGE_ADC_CHANNEL, 0);
    app.tick(2_000, &mut hw, &mut sink, &mut net);
    assert!(!hw.led_is_on());
    assert_eq!(hw.motor_rpm(), 128);
    assert_eq!(app.set_motor_rpm("0", &mut hw, &mut sink), -1);
}
