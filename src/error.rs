//! Error types for the codec and transport.

use std::io;
use thiserror::Error;

/// Result alias for codec and transport operations.
pub type Result<T> = std::result::Result<T, ThorwireError>;

/// Top-level error returned by the public API.
#[derive(Error, Debug)]
pub enum ThorwireError {
    #[error("Could not connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Transport is {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failure while pushing a buffer onto the connection.
///
/// Every variant reports how many bytes reached the socket before the failure.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Cannot write to a transport that is not connected")]
    NotConnected,

    #[error("Timed out writing {total} bytes to stream after writing {written} bytes")]
    TimedOut { total: usize, written: usize },

    #[error("Could not write {total} bytes to stream (not writable)")]
    NotWritable {
        total: usize,
        written: usize,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Could not write {total} bytes to stream, completed writing only {written} bytes")]
    Failed {
        total: usize,
        written: usize,
        #[source]
        source: io::Error,
    },

    #[error(
        "After {attempts} attempts could not write {total} bytes to stream, completed writing only {written} bytes"
    )]
    Stalled {
        attempts: u32,
        total: usize,
        written: usize,
    },
}

impl WriteError {
    /// Bytes completed before the failure.
    pub fn written(&self) -> usize {
        match self {
            WriteError::NotConnected => 0,
            WriteError::TimedOut { written, .. }
            | WriteError::NotWritable { written, .. }
            | WriteError::Failed { written, .. }
            | WriteError::Stalled { written, .. } => *written,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WriteError::TimedOut { .. })
    }
}

/// Failure while pulling an exact-length buffer off the connection.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Invalid length {length} given, it should be lesser than or equals to {max}")]
    TooLarge { length: usize, max: usize },

    #[error("Cannot read from a transport that is not connected")]
    NotConnected,

    #[error("Timed out reading {length} bytes from stream, {remaining} bytes are still needed")]
    TimedOut { length: usize, remaining: usize },

    #[error("Could not read {length} bytes from stream (not readable)")]
    NotReadable {
        length: usize,
        remaining: usize,
        #[source]
        source: Option<io::Error>,
    },

    #[error("Unexpected EOF while reading {length} bytes from stream, {remaining} bytes are still needed")]
    UnexpectedEof { length: usize, remaining: usize },

    #[error("Could not read {length} bytes from stream, {remaining} bytes are still needed")]
    Failed {
        length: usize,
        remaining: usize,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReadError::TimedOut { .. })
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, ReadError::UnexpectedEof { .. })
    }
}

/// Failure while encoding or decoding a struct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Field {field} is not nullable but holds no value")]
    MissingValue { field: &'static str },

    #[error("Field {field} expects a value of type {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("{0} trailing bytes after decoded struct")]
    TrailingBytes(usize),

    #[error("Invalid length field: {0}")]
    InvalidLength(i64),

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Unsigned varint is longer than 5 bytes or overflows 32 bits")]
    VarintTooLong,

    #[error("Length {0} does not fit the wire length prefix")]
    LengthOverflow(usize),
}
