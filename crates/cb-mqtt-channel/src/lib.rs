//! MQTT channel for the current bridge.
//!
//! Provides a typed MQTT abstraction:
//! - `Channel` trait for publish/subscribe plus an explicit connection query
//! - `MqttChannel` with TLS (pinned CA, username/password) for production
//! - `MockChannel` for testing without a broker
//! - `TransportEvent` classification of rumqttc events
//! - `driver::run` to poll the event loop and push typed events

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod mock;
pub mod session;
pub mod tls;

// Re-exports for convenience.
pub use channel::{Channel, MessageId, MqttChannel};
pub use config::MqttConfig;
pub use error::{MqttError, MqttResult};
pub use events::{TransportErrorKind, TransportEvent, classify, classify_error};
pub use mock::MockChannel;
pub use session::SessionState;
