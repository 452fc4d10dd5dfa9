//! Transport configuration.

use crate::error::{Result, ThorwireError};
use serde::Deserialize;
use std::time::Duration;

/// Largest frame `recv` will allocate for (5 MiB).
pub const MAX_FRAME_LENGTH: usize = 5_242_880;

/// Largest slice handed to a single socket write.
pub const MAX_WRITE_CHUNK: usize = 2048;

const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 3;

/// How long a readiness wait may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until the socket is ready.
    Never,
    After(Duration),
}

impl Timeout {
    /// Seconds, fractional allowed. Any negative value waits indefinitely.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_nan() || secs < 0.0 {
            return Timeout::Never;
        }
        Duration::try_from_secs_f64(secs)
            .map(Timeout::After)
            .unwrap_or(Timeout::Never)
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            Timeout::Never => None,
            Timeout::After(d) => Some(*d),
        }
    }

    /// Whole seconds and the microsecond remainder, as a select-style wait takes them.
    pub fn split(&self) -> Option<(u64, u32)> {
        self.duration().map(|d| (d.as_secs(), d.subsec_micros()))
    }
}

/// Options for one [`Transport`](crate::Transport) connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportConfig {
    /// Connect timeout in seconds; negative waits indefinitely.
    pub connect_timeout: f64,
    /// Per-write readiness timeout in seconds.
    pub send_timeout: f64,
    /// Per-read readiness timeout in seconds.
    pub recv_timeout: f64,
    /// Consecutive zero-byte writes tolerated before `send` gives up.
    pub max_write_attempts: u32,
    /// Largest length `recv` accepts, in bytes.
    pub max_frame_length: usize,
    /// Largest slice passed to one socket write, in bytes.
    pub max_write_chunk: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: -1.0,
            send_timeout: -1.0,
            recv_timeout: -1.0,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            max_frame_length: MAX_FRAME_LENGTH,
            max_write_chunk: MAX_WRITE_CHUNK,
        }
    }
}

impl TransportConfig {
    /// Defaults overridden by `THORWIRE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = env_f64("THORWIRE_CONNECT_TIMEOUT")? {
            config.connect_timeout = v;
        }
        if let Some(v) = env_f64("THORWIRE_SEND_TIMEOUT")? {
            config.send_timeout = v;
        }
        if let Some(v) = env_f64("THORWIRE_RECV_TIMEOUT")? {
            config.recv_timeout = v;
        }
        if let Ok(raw) = std::env::var("THORWIRE_MAX_WRITE_ATTEMPTS") {
            config.max_write_attempts = raw.trim().parse().map_err(|_| {
                ThorwireError::InvalidConfig(format!("THORWIRE_MAX_WRITE_ATTEMPTS={}", raw))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable sizes. Negative timeouts are accepted but logged,
    /// since they turn every wait on the connection into an unbounded block.
    pub fn validate(&self) -> Result<()> {
        if self.max_write_chunk == 0 {
            return Err(ThorwireError::InvalidConfig(
                "maxWriteChunk must be greater than zero".into(),
            ));
        }
        if self.max_frame_length == 0 {
            return Err(ThorwireError::InvalidConfig(
                "maxFrameLength must be greater than zero".into(),
            ));
        }
        for (name, value) in [
            ("connectTimeout", self.connect_timeout),
            ("sendTimeout", self.send_timeout),
            ("recvTimeout", self.recv_timeout),
        ] {
            if value < 0.0 {
                tracing::warn!(option = name, value, "negative timeout, waits will block indefinitely");
            }
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Timeout {
        Timeout::from_secs_f64(self.connect_timeout)
    }

    pub fn send_timeout(&self) -> Timeout {
        Timeout::from_secs_f64(self.send_timeout)
    }

    pub fn recv_timeout(&self) -> Timeout {
        Timeout::from_secs_f64(self.recv_timeout)
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ThorwireError::InvalidConfig(format!("{}={}", key, raw))),
        Err(_) => Ok(None),
    }
}
