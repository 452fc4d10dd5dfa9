//! Thorwire: Kafka-compatible versioned struct codec and blocking TCP transport.

pub mod config;
pub mod error;
pub mod protocol;
pub mod transport;

pub use config::{Timeout, TransportConfig, MAX_FRAME_LENGTH, MAX_WRITE_CHUNK};
pub use error::{CodecError, ReadError, Result, ThorwireError, WriteError};
pub use protocol::{decode, encode, Struct};
pub use transport::{Interest, Readiness, Socket, Transport};
