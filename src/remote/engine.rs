//! Remote engine: dispatches decoded requests to the AppService.
//!
//! **Transport-decoupled**: the engine does not own a transport.  The
//! control loop feeds it frames drained from the command channel and gets
//! back length-prefixed response frames.
//!
//! Frames arrive here only after the I/O thread has authenticated the
//! peer (see [`auth`](super::auth)).
//!
//! Every request passes through a token bucket (via `burster`) before it
//! reaches the service; excess requests are answered with
//! `Error(RateLimited)` and have no side effects.

use core::time::Duration;

use burster::Limiter;
use heapless::Vec;
use log::{debug, warn};

use crate::app::commands::AppCommand;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::AppService;
use crate::config::SystemConfig;
use crate::error::RemoteError;

use super::channels::RESPONSE_FRAME_CAP;
use super::codec::{HEADER_SIZE, encode_frame};
use super::protocol::{
    FN_SET_RPM, Request, Response, VAR_RPM, VAR_TEMPERATURE, VAR_VOLTAGE, decode_request, encode,
};

pub struct RemoteEngine {
    limiter: burster::TokenBucket<fn() -> Duration>,
    handled: u32,
}

impl RemoteEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            limiter: burster::TokenBucket::new_with_time_provider(
                u64::from(config.remote_rate_per_sec),
                u64::from(config.remote_burst),
                platform_now as fn() -> Duration,
            ),
            handled: 0,
        }
    }

    /// Requests answered since boot (including rejections).
    pub fn handled(&self) -> u32 {
        self.handled
    }

    /// Execute one request against the service.
    pub fn handle(
        &mut self,
        request: Request,
        app: &mut AppService,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Response {
        self.handled = self.handled.wrapping_add(1);
        if self.limiter.try_consume(1).is_err() {
            warn!("remote: rate limited");
            return Response::Error(RemoteError::RateLimited);
        }

        match request {
            Request::AuthChallenge | Request::AuthVerify { .. } => {
                warn!("remote: handshake message reached the control loop");
                Response::Error(RemoteError::Malformed)
            }
            Request::Call { function, argument } => {
                if function.as_str() == FN_SET_RPM {
                    Response::Return(app.handle_command(AppCommand::SetRpm(argument), hw, sink))
                } else {
                    warn!("remote: unknown function {function:?}");
                    Response::Error(RemoteError::UnknownFunction)
                }
            }
            Request::Get { variable } => {
                let obs = app.observables();
                match variable.as_str() {
                    VAR_TEMPERATURE => Response::Float(obs.temperature_c),
                    VAR_VOLTAGE => Response::Float(obs.voltage_v),
                    VAR_RPM => Response::Int(i32::from(obs.rpm)),
                    _ => {
                        warn!("remote: unknown variable {variable:?}");
                        Response::Error(RemoteError::UnknownVariable)
                    }
                }
            }
        }
    }

    /// Decode one frame payload, execute it, and encode the reply frame.
    pub fn dispatch_frame(
        &mut self,
        payload: &[u8],
        app: &mut AppService,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<Vec<u8, RESPONSE_FRAME_CAP>> {
        let response = match decode_request(payload) {
            Ok(req) => {
                debug!("remote: {req:?}");
                self.handle(req, app, hw, sink)
            }
            Err(e) => {
                warn!("remote: {e}");
                Response::Error(e)
            }
        };
        encode_response_frame(&response)
    }
}

/// Encode a response as a complete length-prefixed frame.
pub fn encode_response_frame(response: &Response) -> Option<Vec<u8, RESPONSE_FRAME_CAP>> {
    let mut payload = [0u8; RESPONSE_FRAME_CAP - HEADER_SIZE];
    let body = encode(response, &mut payload)?;
    let mut out = [0u8; RESPONSE_FRAME_CAP];
    let n = encode_frame(body, &mut out)?;
    Vec::from_slice(&out[..n]).ok()
}

#[cfg(target_os = "espidf")]
fn platform_now() -> Duration {
    // SAFETY: esp_timer_get_time has no preconditions after boot.
    let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    Duration::from_micros(us.max(0) as u64)
}

#[cfg(not(target_os = "espidf"))]
fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}
