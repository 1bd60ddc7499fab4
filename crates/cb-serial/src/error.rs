//! Serial input error types.

use thiserror::Error;

/// Errors that can occur while reading the serial port.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open serial device '{device}': {message}")]
    Open { device: String, message: String },

    #[error("no data within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("serial stream closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias for serial results.
pub type SerialResult<T> = Result<T, SerialError>;

/// Why a chunk of serial input is not a current reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("input does not start with \"Current reading:\"")]
    PatternMismatch,

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("missing \"A\" unit after value")]
    MissingUnit,

    #[error("value is not finite")]
    NonFinite,
}
