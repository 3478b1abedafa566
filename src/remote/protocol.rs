//! Remote command protocol messages.
//!
//! Requests and responses are serde enums encoded with `postcard` and
//! carried in length-prefixed frames (see [`codec`](super::codec)).
//!
//! | Request                                  | Response                         |
//! |------------------------------------------|----------------------------------|
//! | `AuthChallenge`                          | `Challenge { session_id, nonce }`|
//! | `AuthVerify { session_id, tag }`         | `Authenticated`                  |
//! | `Call { function: "setRPM", argument }`  | `Return(1/-1/-2/-3)`             |
//! | `Get { variable: "temperature" }`        | `Float(°C)`                      |
//! | `Get { variable: "voltage" }`            | `Float(V)`                       |
//! | `Get { variable: "rpm" }`                | `Int(0..=255)`                   |
//!
//! `Call` and `Get` are refused with `Error(Unauthenticated)` until the
//! handshake in [`auth`](super::auth) completes.

use serde::{Deserialize, Serialize};

use crate::app::commands::MAX_ARG_LEN;
use crate::error::RemoteError;

use super::auth::{NONCE_LEN, TAG_LEN};

pub const FN_SET_RPM: &str = "setRPM";
pub const VAR_TEMPERATURE: &str = "temperature";
pub const VAR_VOLTAGE: &str = "voltage";
pub const VAR_RPM: &str = "rpm";

pub type Name = heapless::String<16>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    AuthChallenge,
    AuthVerify {
        session_id: u32,
        tag: [u8; TAG_LEN],
    },
    Call {
        function: Name,
        argument: heapless::String<MAX_ARG_LEN>,
    },
    Get {
        variable: Name,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// Integer result of a function call.
    Return(i32),
    Float(f32),
    Int(i32),
    Challenge {
        session_id: u32,
        nonce: [u8; NONCE_LEN],
    },
    Authenticated,
    Error(RemoteError),
}

pub fn decode_request(payload: &[u8]) -> Result<Request, RemoteError> {
    postcard::from_bytes(payload).map_err(|_| RemoteError::Malformed)
}

pub fn decode_response(payload: &[u8]) -> Result<Response, RemoteError> {
    postcard::from_bytes(payload).map_err(|_| RemoteError::Malformed)
}

/// Serialize into `buf`, returning the used prefix.
pub fn encode<'a, T: Serialize>(msg: &T, buf: &'a mut [u8]) -> Option<&'a mut [u8]> {
    postcard::to_slice(msg, buf).ok()
}
