//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | SensorPort         | ESP32 ADC, GPIO          |
//! |            | ActuatorPort       | ESP32 LEDC PWM, GPIO     |
//! | `http`     | ReportPort         | ThingSpeak over HTTP     |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `time`     | ClockPort          | ESP32 system timer       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
