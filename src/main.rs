//! SensorWatch firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   HttpReporter   SystemClock   │
//! │  (Sensor+Actuator) (EventSink)    (ReportPort)   (ClockPort)   │
//! │  WifiAdapter       RemoteEngine ◀── channels ── remote-io thread│
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Alerts · Button guard · setRPM · Report timer         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The control loop is the only writer of device state.  Between ticks it
//! drains remote requests every [`REMOTE_POLL`].

use core::time::Duration;

use anyhow::{Result, anyhow};
use esp_idf_hal::gpio::{Pin, PinDriver, Pull};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};

use sensorwatch::adapters::hardware::HardwareAdapter;
use sensorwatch::adapters::http::HttpReporter;
use sensorwatch::adapters::log_sink::LogEventSink;
use sensorwatch::adapters::time::SystemClock;
use sensorwatch::adapters::wifi::WifiAdapter;
use sensorwatch::app::ports::{ActuatorPort, ClockPort, ConnectivityPort, EventSink};
use sensorwatch::app::service::AppService;
use sensorwatch::config::{REMOTE_PSK, SystemConfig, WIFI_PASS, WIFI_SSID};
use sensorwatch::drivers::button::ButtonDriver;
use sensorwatch::drivers::hw_init;
use sensorwatch::drivers::led::IndicatorLed;
use sensorwatch::drivers::motor::MotorDriver;
use sensorwatch::pins;
use sensorwatch::remote::channels::{send_response, try_recv_command};
use sensorwatch::remote::engine::RemoteEngine;
use sensorwatch::remote::io_task;
use sensorwatch::remote::transport::{NullTransport, TcpTransport};
use sensorwatch::sensors::SensorHub;

/// Remote request drain period between control ticks.
const REMOTE_POLL: Duration = Duration::from_millis(20);

/// Re-association attempt period while WiFi is down.
const WIFI_RETRY_MS: u64 = 30_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("SensorWatch v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow!("config: {e}"))?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_adc().map_err(|e| anyhow!("{e}"))?;

    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    let led_gpio = gpio.gpio4;
    let motor_gpio = gpio.gpio5;
    let button_gpio = gpio.gpio6;
    check_pin(&led_gpio, pins::LED_GPIO, "LED")?;
    check_pin(&motor_gpio, pins::MOTOR_PWM_GPIO, "motor PWM")?;
    check_pin(&button_gpio, pins::BUTTON_GPIO, "button")?;

    let led_pin = PinDriver::output(led_gpio)?;
    let mut button_pin = PinDriver::input(button_gpio)?;
    button_pin.set_pull(Pull::Up)?;

    let motor_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::MOTOR_PWM_FREQ_HZ))
            .resolution(Resolution::Bits8),
    )?;
    let motor_pwm = LedcDriver::new(peripherals.ledc.channel0, &motor_timer, motor_gpio)?;

    let mut hw = HardwareAdapter::new(
        SensorHub::new(&config),
        IndicatorLed::new(led_pin),
        MotorDriver::new(motor_pwm),
        ButtonDriver::new(button_pin),
    );
    let mut sink = LogEventSink::new();
    let clock = SystemClock::new();

    // ── 4. Application core ───────────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut hw, &mut sink);

    // ── 5. Network ────────────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?, WIFI_SSID, WIFI_PASS)
        .map_err(|e| anyhow!("wifi: {e}"))?;
    if let Err(e) = wifi.connect() {
        warn!("WiFi unavailable at boot ({e}), reports will fail until it connects");
    }
    let mut last_wifi_attempt = clock.now_ms();

    let psk = REMOTE_PSK.as_bytes();
    let _io = if psk.is_empty() {
        warn!("remote: no REMOTE_PSK baked in, remote commands disabled");
        io_task::spawn(NullTransport, psk)?
    } else {
        match TcpTransport::bind(config.remote_port) {
            Ok(tcp) => io_task::spawn(tcp, psk)?,
            Err(e) => {
                warn!("remote: bind :{} failed ({e}), remote commands disabled", config.remote_port);
                io_task::spawn(NullTransport, psk)?
            }
        }
    };

    let mut http = HttpReporter::new();
    let mut engine = RemoteEngine::new(&config);
    let interval_ms = u64::from(config.control_loop_interval_ms);

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let tick_start = clock.now_ms();
        app.tick(tick_start, &mut hw, &mut sink, &mut http);

        if !wifi.is_connected() && tick_start.saturating_sub(last_wifi_attempt) >= WIFI_RETRY_MS {
            last_wifi_attempt = tick_start;
            if let Err(e) = wifi.connect() {
                warn!("WiFi retry failed: {e}");
            }
        }

        let next_tick = tick_start + interval_ms;
        loop {
            drain_remote(&mut engine, &mut app, &mut hw, &mut sink);
            if clock.now_ms() >= next_tick {
                break;
            }
            std::thread::sleep(REMOTE_POLL);
        }
    }
}

/// Refuse to boot when a taken peripheral pin disagrees with [`pins`].
fn check_pin(pin: &impl Pin, expected: i32, role: &str) -> Result<()> {
    let actual = i32::from(pin.pin());
    if actual == expected {
        Ok(())
    } else {
        Err(anyhow!("{role}: took GPIO{actual}, pins table says GPIO{expected}"))
    }
}

fn drain_remote(
    engine: &mut RemoteEngine,
    app: &mut AppService,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) {
    while let Some(cmd) = try_recv_command() {
        if let Some(frame) = engine.dispatch_frame(&cmd.frame, app, hw, sink) {
            send_response(cmd.peer, frame);
        }
    }
}
