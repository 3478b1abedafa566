//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - [`NullTransport`]: never reads, discards writes
//! - [`TcpTransport`]: one TCP client at a time over WiFi (std sockets,
//!   which ESP-IDF provides through lwIP)
//!
//! The I/O bridge is generic over `Transport`, so adding a new
//! transport requires zero changes to the remote logic.

use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use log::{info, warn};

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if a peer is attached.
    fn available(&self) -> bool;

    /// Poll for a new peer.  Returns `true` when one was attached since
    /// the last call, so framing state can be reset.
    fn accept(&mut self) -> bool {
        false
    }
}

/// A null transport that discards all writes and never reads.
/// Useful as a default when no remote client is configured.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub enum TcpTransportError {
    NotConnected,
    Io(io::ErrorKind),
}

/// How long a read waits for bytes before reporting "nothing available".
const READ_POLL: Duration = Duration::from_millis(5);

/// Single-client TCP listener.  A new connection replaces the old one.
pub struct TcpTransport {
    listener: TcpListener,
    client: Option<TcpStream>,
}

impl TcpTransport {
    pub fn bind(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))?;
        listener.set_nonblocking(true)?;
        info!("remote: listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            client: None,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    fn drop_client(&mut self) {
        if self.client.take().is_some() {
            info!("remote: client disconnected");
        }
    }
}

impl Transport for TcpTransport {
    type Error = TcpTransportError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TcpTransportError> {
        let Some(stream) = self.client.as_mut() else {
            return Ok(0);
        };
        match stream.read(buf) {
            Ok(0) => {
                self.drop_client();
                Err(TcpTransportError::NotConnected)
            }
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(0)
            }
            Err(e) => {
                warn!("remote: read error: {e}");
                self.drop_client();
                Err(TcpTransportError::Io(e.kind()))
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TcpTransportError> {
        let stream = self.client.as_mut().ok_or(TcpTransportError::NotConnected)?;
        if let Err(e) = stream.write_all(data) {
            warn!("remote: write error: {e}");
            self.drop_client();
            return Err(TcpTransportError::Io(e.kind()));
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), TcpTransportError> {
        match self.client.as_mut() {
            Some(stream) => stream.flush().map_err(|e| TcpTransportError::Io(e.kind())),
            None => Ok(()),
        }
    }

    fn available(&self) -> bool {
        self.client.is_some()
    }

    fn accept(&mut self) -> bool {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream
                    .set_nonblocking(false)
                    .and_then(|()| stream.set_read_timeout(Some(READ_POLL)))
                    .and_then(|()| stream.set_nodelay(true))
                {
                    warn!("remote: configuring {peer}: {e}");
                    return false;
                }
                if self.client.replace(stream).is_some() {
                    info!("remote: replacing previous client");
                }
                info!("remote: client {peer} connected");
                true
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
            Err(e) => {
                warn!("remote: accept: {e}");
                false
            }
        }
    }
}
