//! Remote session authentication: PSK challenge-response over HMAC-SHA256.
//!
//! 1. Client sends `Request::AuthChallenge`
//! 2. Device replies `Response::Challenge { session_id, nonce }`
//! 3. Client sends `Request::AuthVerify { session_id, tag }` where
//!    `tag = HMAC-SHA256(psk, nonce)`
//! 4. Device replies `Response::Authenticated`, or
//!    `Error(Unauthenticated)` and drops back to step 1
//!
//! Until step 4 succeeds every `Call` and `Get` is refused by the I/O
//! thread and never reaches the control loop.  A new peer starts over.
//!
//! Crypto is `hmac-sha256`: pure Rust, no_std, constant-time verify.

use log::{info, warn};

use crate::error::RemoteError;

use super::protocol::{Request, Response};

pub const NONCE_LEN: usize = 32;
pub const TAG_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Challenged {
        nonce: [u8; NONCE_LEN],
        session_id: u32,
    },
    Authenticated {
        session_id: u32,
    },
}

/// What the I/O thread should do with one decoded request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// Queue the frame for the control loop.
    Forward,
    /// Answer directly on the transport; nothing is queued.
    Reply(Response),
}

/// Auth state of the single attached peer.
pub struct Session {
    psk: &'static [u8],
    state: SessionState,
    next_session_id: u32,
}

impl Session {
    /// An empty `psk` makes every verification fail.
    pub fn new(psk: &'static [u8]) -> Self {
        Self {
            psk,
            state: SessionState::Unauthenticated,
            next_session_id: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Unauthenticated;
    }

    /// Start a handshake.  Any previous session is discarded.
    pub fn begin_challenge(&mut self) -> (u32, [u8; NONCE_LEN]) {
        let session_id = self.next_session_id;
        self.next_session_id = self.next_session_id.wrapping_add(1);
        let nonce = fill_random_nonce();
        self.state = SessionState::Challenged { nonce, session_id };
        (session_id, nonce)
    }

    /// Check the client's tag against the outstanding nonce.  Any failure
    /// returns the session to `Unauthenticated`.
    pub fn verify_response(&mut self, session_id: u32, tag: &[u8; TAG_LEN]) -> bool {
        let SessionState::Challenged {
            nonce,
            session_id: expected,
        } = self.state
        else {
            warn!("auth: verify without an outstanding challenge");
            return false;
        };

        if session_id != expected {
            warn!("auth: session_id mismatch (got {session_id}, expected {expected})");
            self.reset();
            return false;
        }
        if self.psk.is_empty() {
            warn!("auth: no PSK configured, refusing");
            self.reset();
            return false;
        }
        if !hmac_sha256::HMAC::verify(nonce, self.psk, tag) {
            warn!("auth: HMAC verification failed");
            self.reset();
            return false;
        }

        info!("auth: session {session_id} authenticated");
        self.state = SessionState::Authenticated { session_id };
        true
    }

    /// Gate one decoded request.  Handshake messages are answered here;
    /// everything else is forwarded only once authenticated.
    pub fn admit(&mut self, request: Result<Request, RemoteError>) -> Admission {
        match request {
            Ok(Request::AuthChallenge) => {
                let (session_id, nonce) = self.begin_challenge();
                Admission::Reply(Response::Challenge { session_id, nonce })
            }
            Ok(Request::AuthVerify { session_id, tag }) => {
                if self.verify_response(session_id, &tag) {
                    Admission::Reply(Response::Authenticated)
                } else {
                    Admission::Reply(Response::Error(RemoteError::Unauthenticated))
                }
            }
            Ok(_) if self.is_authenticated() => Admission::Forward,
            Ok(req) => {
                warn!("auth: refusing {req:?} before authentication");
                Admission::Reply(Response::Error(RemoteError::Unauthenticated))
            }
            Err(e) => Admission::Reply(Response::Error(e)),
        }
    }
}

/// `HMAC-SHA256(psk, nonce)`: the client side of the handshake.
pub fn compute_tag(psk: &[u8], nonce: &[u8; NONCE_LEN]) -> [u8; TAG_LEN] {
    hmac_sha256::HMAC::mac(nonce, psk)
}

/// ESP-IDF: hardware RNG.
#[cfg(target_os = "espidf")]
fn fill_random_nonce() -> [u8; NONCE_LEN] {
    let mut buf = [0u8; NONCE_LEN];
    // SAFETY: esp_fill_random writes exactly `len` bytes into a buffer we own.
    unsafe {
        esp_idf_svc::sys::esp_fill_random(buf.as_mut_ptr().cast(), buf.len());
    }
    buf
}

/// Host simulation: `RandomState` entropy, not cryptographic.
#[cfg(not(target_os = "espidf"))]
fn fill_random_nonce() -> [u8; NONCE_LEN] {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut buf = [0u8; NONCE_LEN];
    for chunk in buf.chunks_mut(8) {
        let val = RandomState::new().build_hasher().finish().to_le_bytes();
        chunk.copy_from_slice(&val[..chunk.len()]);
    }
    buf
}
