//! Remote I/O thread: transport ↔ channel bridge.
//!
//! Runs in a dedicated std thread and never touches device state:
//!
//! 1. **Accept**: let the transport attach a new peer.  Framing and the
//!    auth session start over, and responses still queued for the previous
//!    peer are discarded.
//! 2. **Read**: decode length-prefixed frames.  Handshake messages and
//!    anything sent before authentication are answered here; the rest go
//!    to `CMD_CHANNEL`.
//! 3. **Write**: drain `RESP_CHANNEL` onto the transport, skipping
//!    responses addressed to an older peer.
//!
//! When a pass moves no bytes the thread sleeps for [`IDLE_POLL`].

use core::time::Duration;

use log::{info, warn};

use super::auth::{Admission, Session};
use super::channels::{PeerId, drain_responses, send_command, try_recv_response};
use super::codec::FrameDecoder;
use super::engine::encode_response_frame;
use super::protocol::{Response, decode_request};
use super::transport::Transport;

const READ_BUF_SIZE: usize = 256;

/// Sleep between idle polling passes.
pub const IDLE_POLL: Duration = Duration::from_millis(10);

const IO_STACK_SIZE: usize = 8 * 1024;

pub struct IoBridge<T> {
    transport: T,
    decoder: FrameDecoder,
    session: Session,
    peer: PeerId,
}

impl<T: Transport> IoBridge<T> {
    pub fn new(transport: T, psk: &'static [u8]) -> Self {
        Self {
            transport,
            decoder: FrameDecoder::new(),
            session: Session::new(psk),
            peer: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Generation of the currently attached peer.
    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// One accept/read/write pass.  Returns the number of frames moved in
    /// either direction.
    pub fn poll_once(&mut self) -> usize {
        if self.transport.accept() {
            self.start_over();
            let stale = drain_responses();
            if stale > 0 {
                info!("remote io: dropped {stale} response(s) for the previous peer");
            }
        }
        self.pump_inbound() + self.pump_outbound()
    }

    fn start_over(&mut self) {
        self.decoder.reset();
        self.session.reset();
        self.peer = self.peer.wrapping_add(1);
    }

    fn pump_inbound(&mut self) -> usize {
        let mut buf = [0u8; READ_BUF_SIZE];
        let n = match self.transport.read(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                info!("remote io: read ended ({e:?})");
                self.start_over();
                return 0;
            }
        };

        let mut frames = 0;
        let mut offset = 0;
        while offset < n {
            let (used, frame) = self.decoder.feed(&buf[offset..n]);
            offset += used;
            if let Some(frame) = frame {
                match self.session.admit(decode_request(frame)) {
                    Admission::Forward => {
                        if send_command(self.peer, frame) {
                            frames += 1;
                        }
                    }
                    Admission::Reply(response) => {
                        if write_response(&mut self.transport, &response) {
                            frames += 1;
                        }
                    }
                }
            }
            if used == 0 {
                break;
            }
        }
        frames
    }

    fn pump_outbound(&mut self) -> usize {
        let mut frames = 0;
        while let Some(resp) = try_recv_response() {
            if resp.peer != self.peer || !self.transport.available() {
                continue;
            }
            if write_frame(&mut self.transport, &resp.data) {
                frames += 1;
            }
        }
        frames
    }

    /// Poll forever.
    pub fn run(mut self) {
        loop {
            if self.poll_once() == 0 {
                std::thread::sleep(IDLE_POLL);
            }
        }
    }
}

fn write_response<T: Transport>(transport: &mut T, response: &Response) -> bool {
    match encode_response_frame(response) {
        Some(frame) => write_frame(transport, &frame),
        None => {
            warn!("remote io: response does not fit a frame");
            false
        }
    }
}

fn write_frame<T: Transport>(transport: &mut T, frame: &[u8]) -> bool {
    match transport.write(frame) {
        Ok(_) => {
            let _ = transport.flush();
            true
        }
        Err(e) => {
            warn!("remote io: write failed ({e:?})");
            false
        }
    }
}

/// Spawn the I/O bridge on its own thread.
pub fn spawn<T>(transport: T, psk: &'static [u8]) -> std::io::Result<std::thread::JoinHandle<()>>
where
    T: Transport + Send + 'static,
{
    std::thread::Builder::new()
        .name("remote-io".into())
        .stack_size(IO_STACK_SIZE)
        .spawn(move || {
            info!("remote io: thread started");
            IoBridge::new(transport, psk).run();
        })
}
