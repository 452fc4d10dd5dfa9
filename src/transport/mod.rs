//! Blocking TCP transport: one connection, one in-flight request.
//!
//! `send` and `recv` move exact byte counts, looping over partial writes and
//! reads. Every write and read is preceded by a readiness wait bounded by the
//! configured timeout. Read failures close the connection; write failures leave
//! it to the caller.

mod socket;

pub use socket::{Interest, Readiness, Socket};

use crate::config::{Timeout, TransportConfig};
use crate::error::{ReadError, Result, ThorwireError, WriteError};
use bytes::Bytes;
use socket::{is_timeout, socket_timeout};
use std::io::{self, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, trace, warn};

enum State<S> {
    Unconnected,
    Connected(S),
    /// Terminal; reconnecting needs a new transport.
    Closed,
}

/// Client side of a single broker connection.
pub struct Transport<S = TcpStream> {
    host: String,
    port: u16,
    config: TransportConfig,
    state: State<S>,
}

impl Transport<TcpStream> {
    /// Unconnected transport for `host:port`.
    pub fn new(host: impl Into<String>, port: u16, config: TransportConfig) -> Self {
        Self {
            host: host.into(),
            port,
            config,
            state: State::Unconnected,
        }
    }

    /// Open the TCP connection, bounded by the connect timeout.
    pub fn connect(&mut self) -> Result<()> {
        match self.state {
            State::Unconnected => {}
            State::Connected(_) => return Err(ThorwireError::InvalidState("already connected")),
            State::Closed => return Err(ThorwireError::InvalidState("closed")),
        }
        self.config.validate()?;

        let addr = format!("{}:{}", self.host, self.port);
        let stream = open(&addr, self.config.connect_timeout())
            .and_then(|stream| stream.set_nodelay(true).map(|()| stream))
            .map_err(|source| ThorwireError::Connection {
                addr: format!("tcp://{}", addr),
                source,
            })?;
        debug!(addr = %addr, "transport connected");
        self.state = State::Connected(stream);
        Ok(())
    }
}

fn open(addr: &str, timeout: Timeout) -> io::Result<TcpStream> {
    let Some(timeout) = socket_timeout(timeout) else {
        return TcpStream::connect(addr);
    };
    let mut last_err = None;
    for candidate in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "address resolved to no hosts")
    }))
}

impl<S: Socket> Transport<S> {
    /// Wrap a socket that is already connected.
    pub fn with_socket(host: impl Into<String>, port: u16, config: TransportConfig, socket: S) -> Self {
        Self {
            host: host.into(),
            port,
            config,
            state: State::Connected(socket),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    /// The live socket, if connected.
    pub fn socket(&self) -> Option<&S> {
        match &self.state {
            State::Connected(socket) => Some(socket),
            _ => None,
        }
    }

    /// Release the connection. Returns whether one was open.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Connected(socket) => {
                drop(socket);
                debug!(host = %self.host, port = self.port, "transport closed");
                true
            }
            _ => false,
        }
    }

    /// Write all of `data`, in chunks of at most `max_write_chunk` bytes.
    ///
    /// Returns the number of bytes written, which is always `data.len()`.
    pub fn send(&mut self, data: &[u8]) -> Result<usize> {
        let State::Connected(socket) = &mut self.state else {
            return Err(WriteError::NotConnected.into());
        };
        let total = data.len();
        let timeout = self.config.send_timeout();
        let chunk = self.config.max_write_chunk.max(1);
        let mut written = 0usize;
        let mut failed_attempts = 0u32;

        while written < total {
            match socket.wait(Interest::Writable, timeout) {
                Readiness::Ready => {}
                Readiness::TimedOut => return Err(WriteError::TimedOut { total, written }.into()),
                Readiness::NotReady(source) => {
                    return Err(WriteError::NotWritable {
                        total,
                        written,
                        source,
                    }
                    .into())
                }
            }

            let end = total.min(written + chunk);
            match socket.write(&data[written..end]) {
                Ok(0) => {
                    failed_attempts += 1;
                    warn!(attempt = failed_attempts, written, total, "socket accepted no bytes");
                    if failed_attempts > self.config.max_write_attempts {
                        return Err(WriteError::Stalled {
                            attempts: failed_attempts,
                            total,
                            written,
                        }
                        .into());
                    }
                }
                Ok(n) => {
                    failed_attempts = 0;
                    written += n;
                    trace!(wrote = n, written, total, "socket write");
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) if is_timeout(&e) => {
                    return Err(WriteError::TimedOut { total, written }.into())
                }
                Err(source) => {
                    return Err(WriteError::Failed {
                        total,
                        written,
                        source,
                    }
                    .into())
                }
            }
        }
        Ok(written)
    }

    /// Read exactly `length` bytes.
    ///
    /// Lengths above `max_frame_length` are rejected before touching the socket.
    /// Any other failure closes the connection before returning.
    pub fn recv(&mut self, length: usize) -> Result<Bytes> {
        let max = self.config.max_frame_length;
        if length > max {
            return Err(ReadError::TooLarge { length, max }.into());
        }
        let State::Connected(socket) = &mut self.state else {
            return Err(ReadError::NotConnected.into());
        };
        if length == 0 {
            return Ok(Bytes::new());
        }
        match read_exact(socket, length, self.config.recv_timeout()) {
            Ok(data) => Ok(data),
            Err(e) => {
                self.close();
                Err(e.into())
            }
        }
    }
}

fn read_exact<S: Socket>(
    socket: &mut S,
    length: usize,
    timeout: Timeout,
) -> std::result::Result<Bytes, ReadError> {
    wait_readable(socket, length, length, timeout)?;

    let mut buf = vec![0u8; length];
    let mut filled = 0usize;
    while filled < length {
        let remaining = length - filled;
        match socket.read(&mut buf[filled..]) {
            Ok(0) => {
                match socket.peer_closed() {
                    Ok(true) => return Err(ReadError::UnexpectedEof { length, remaining }),
                    Ok(false) => {}
                    Err(source) => {
                        return Err(ReadError::Failed {
                            length,
                            remaining,
                            source,
                        })
                    }
                }
                wait_readable(socket, length, remaining, timeout)?;
            }
            Ok(n) => {
                filled += n;
                trace!(read = n, remaining = length - filled, "socket read");
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if is_timeout(&e) => return Err(ReadError::TimedOut { length, remaining }),
            Err(source) => {
                return Err(ReadError::Failed {
                    length,
                    remaining,
                    source,
                })
            }
        }
    }
    Ok(Bytes::from(buf))
}

fn wait_readable<S: Socket>(
    socket: &mut S,
    length: usize,
    remaining: usize,
    timeout: Timeout,
) -> std::result::Result<(), ReadError> {
    match socket.wait(Interest::Readable, timeout) {
        Readiness::Ready => Ok(()),
        Readiness::TimedOut => Err(ReadError::TimedOut { length, remaining }),
        Readiness::NotReady(source) => Err(ReadError::NotReadable {
            length,
            remaining,
            source,
        }),
    }
}
