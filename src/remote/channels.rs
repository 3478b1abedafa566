//! Remote inter-task communication channels.
//!
//! Uses `embassy-sync` bounded channels to bridge the I/O thread with the
//! synchronous control loop.  Both sides share these static channels
//! without heap allocation.  The control loop is the only writer of
//! device state: the I/O thread just moves frames.
//!
//! ```text
//! ┌──────────────┐  CommandMsg  ┌──────────────┐
//! │  I/O thread  │────────────▶│ Control Loop │
//! │              │◀────────────│              │
//! └──────────────┘  ResponseMsg └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

use super::codec::{HEADER_SIZE, MAX_FRAME_SIZE};

/// Capacity of an encoded response frame (fits a `Challenge`).
pub const RESPONSE_FRAME_CAP: usize = 48;

/// Connection generation.  The I/O thread bumps it whenever the peer
/// changes, and drops responses addressed to an older one.
pub type PeerId = u32;

/// Inbound request payload (length prefix already stripped).
pub struct CommandMsg {
    pub peer: PeerId,
    pub frame: Vec<u8, MAX_FRAME_SIZE>,
}

/// Outbound response, already length-prefixed.
pub struct ResponseMsg {
    pub peer: PeerId,
    pub data: Vec<u8, RESPONSE_FRAME_CAP>,
}

const CMD_DEPTH: usize = 8;
const RESP_DEPTH: usize = 8;

/// Inbound command channel: I/O thread → control loop.
pub static CMD_CHANNEL: Channel<CriticalSectionRawMutex, CommandMsg, CMD_DEPTH> = Channel::new();

/// Outbound response channel: control loop → I/O thread.
pub static RESP_CHANNEL: Channel<CriticalSectionRawMutex, ResponseMsg, RESP_DEPTH> =
    Channel::new();

const _: () = assert!(RESPONSE_FRAME_CAP > HEADER_SIZE);

/// Queue a decoded request for the control loop.  Drops it if full.
pub fn send_command(peer: PeerId, frame: &[u8]) -> bool {
    let mut buf = Vec::new();
    if buf.extend_from_slice(frame).is_err() {
        warn!("remote: frame too large for channel buffer");
        return false;
    }
    if CMD_CHANNEL.try_send(CommandMsg { peer, frame: buf }).is_err() {
        warn!("remote: command channel full, dropping frame");
        return false;
    }
    true
}

/// Try to receive an inbound command from the I/O thread.
pub fn try_recv_command() -> Option<CommandMsg> {
    CMD_CHANNEL.try_receive().ok()
}

/// Hand a response frame for `peer` to the I/O thread.
pub fn send_response(peer: PeerId, data: Vec<u8, RESPONSE_FRAME_CAP>) {
    if RESP_CHANNEL.try_send(ResponseMsg { peer, data }).is_err() {
        warn!("remote: response channel full");
    }
}

pub fn try_recv_response() -> Option<ResponseMsg> {
    RESP_CHANNEL.try_receive().ok()
}

/// Discard every queued response.  Returns how many were dropped.
pub fn drain_responses() -> usize {
    let mut dropped = 0;
    while RESP_CHANNEL.try_receive().is_ok() {
        dropped += 1;
    }
    dropped
}
