//! MQTT channel error types.

use thiserror::Error;

/// Errors raised while building or using an [`MqttChannel`](crate::MqttChannel).
#[derive(Debug, Error)]
pub enum MqttError {
    /// The request could not be queued (queue full or event loop gone).
    #[error("publish not queued: {0}")]
    Publish(String),

    #[error("subscribe not queued: {0}")]
    Subscribe(String),

    /// Certificate material missing or unreadable.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("invalid mqtt configuration: {0}")]
    Config(String),
}

/// Convenience alias for MQTT results.
pub type MqttResult<T> = Result<T, MqttError>;
