//! Readiness-aware socket abstraction used by [`Transport`](super::Transport).

use crate::config::Timeout;
use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// OS socket timeouts reject zero; a zero wait is rounded up to this.
const MIN_SOCKET_TIMEOUT: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Readable,
    Writable,
}

/// Outcome of waiting for a socket to become readable or writable.
#[derive(Debug)]
pub enum Readiness {
    Ready,
    /// The wait ran out its timeout.
    TimedOut,
    /// The wait failed for another reason.
    NotReady(Option<io::Error>),
}

/// A connected byte stream the transport can wait on.
pub trait Socket: Read + Write {
    /// Block until the socket is ready for `interest` or `timeout` elapses.
    fn wait(&mut self, interest: Interest, timeout: Timeout) -> Readiness;

    /// Whether a zero-byte read was caused by the peer closing its side.
    fn peer_closed(&mut self) -> io::Result<bool>;
}

pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

pub(crate) fn socket_timeout(timeout: Timeout) -> Option<Duration> {
    timeout.duration().map(|d| d.max(MIN_SOCKET_TIMEOUT))
}

impl Socket for TcpStream {
    fn wait(&mut self, interest: Interest, timeout: Timeout) -> Readiness {
        match interest {
            Interest::Readable => {
                if let Err(e) = self.set_read_timeout(socket_timeout(timeout)) {
                    return Readiness::NotReady(Some(e));
                }
                let mut probe = [0u8; 1];
                loop {
                    // EOF peeks as zero bytes and counts as readable.
                    match self.peek(&mut probe) {
                        Ok(_) => return Readiness::Ready,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) if is_timeout(&e) => return Readiness::TimedOut,
                        Err(e) => return Readiness::NotReady(Some(e)),
                    }
                }
            }
            // std has no writability probe: arm the deadline and let the write enforce it.
            Interest::Writable => match self.set_write_timeout(socket_timeout(timeout)) {
                Ok(()) => Readiness::Ready,
                Err(e) => Readiness::NotReady(Some(e)),
            },
        }
    }

    fn peer_closed(&mut self) -> io::Result<bool> {
        self.set_nonblocking(true)?;
        let mut probe = [0u8; 1];
        let peeked = self.peek(&mut probe);
        self.set_nonblocking(false)?;
        match peeked {
            Ok(0) => Ok(true),
            Ok(_) => Ok(false),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(e),
        }
    }
}
