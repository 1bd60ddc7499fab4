//! Protocol error types.

use thiserror::Error;

/// Errors raised while building or decoding wire data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown phase label: {0:?}")]
    UnknownPhase(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for protocol results.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
