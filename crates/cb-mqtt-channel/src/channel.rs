//! MQTT channel: async client for broker communication.
//!
//! Wraps `rumqttc::AsyncClient` together with the session's connection
//! flag so callers can skip publishing while the broker is unreachable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, Transport};

use crate::config::MqttConfig;
use crate::error::{MqttError, MqttResult};
use crate::session::SessionState;
use crate::tls;

/// Opaque identifier handed out per accepted publish, for log correlation only.
pub type MessageId = u64;

// ── Channel trait ─────────────────────────────────────────────

/// Abstraction for MQTT message publishing and subscribing.
///
/// Enables mocking in tests without a real MQTT broker.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Whether the broker session is currently established.
    fn is_connected(&self) -> bool;

    /// Publish a raw payload to a topic (never retained).
    async fn publish(&self, topic: &str, payload: &[u8], qos: QoS) -> MqttResult<MessageId>;

    /// Subscribe to a topic filter.
    async fn subscribe(&self, filter: &str, qos: QoS) -> MqttResult<()>;
}

// ── MqttChannel ───────────────────────────────────────────────

/// MQTT channel connected to the broker.
///
/// Owns the `AsyncClient` for publishing/subscribing. The `EventLoop`
/// is returned separately from `new()`; the caller must drive it
/// (see [`crate::driver::run`]) or nothing is ever sent.
pub struct MqttChannel {
    client: AsyncClient,
    session: SessionState,
    next_id: AtomicU64,
}

impl MqttChannel {
    /// Create a new MQTT channel with TLS (production mode).
    pub fn new(config: &MqttConfig) -> MqttResult<(Self, EventLoop)> {
        let transport = tls::load_tls_transport(config)?;
        Self::with_transport(config, transport)
    }

    /// Create a channel for local development (no TLS).
    pub fn new_plaintext(config: &MqttConfig) -> MqttResult<(Self, EventLoop)> {
        Self::with_transport(config, tls::plaintext_transport())
    }

    fn with_transport(config: &MqttConfig, transport: Transport) -> MqttResult<(Self, EventLoop)> {
        let options = build_options(config, transport)?;
        let (client, eventloop) = AsyncClient::new(options, config.request_capacity.max(1));

        Ok((
            Self {
                client,
                session: SessionState::new(),
                next_id: AtomicU64::new(1),
            },
            eventloop,
        ))
    }

    /// Connection flag shared with the transport driver.
    pub fn session(&self) -> SessionState {
        self.session.clone()
    }
}

fn build_options(config: &MqttConfig, transport: Transport) -> MqttResult<MqttOptions> {
    if config.broker_host.is_empty() {
        return Err(MqttError::Config("broker_host must not be empty".into()));
    }
    if config.client_id.is_empty() {
        return Err(MqttError::Config("client_id must not be empty".into()));
    }

    let mut options = MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
    options.set_keep_alive(Duration::from_secs(config.keepalive_secs.into()));
    options.set_transport(transport);

    match (&config.username, &config.password) {
        (Some(username), password) => {
            options.set_credentials(username, password.as_deref().unwrap_or_default());
        }
        (None, Some(_)) => {
            return Err(MqttError::Config("password set without username".into()));
        }
        (None, None) => {}
    }

    Ok(options)
}

#[async_trait]
impl Channel for MqttChannel {
    fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    async fn publish(&self, topic: &str, payload: &[u8], qos: QoS) -> MqttResult<MessageId> {
        // try_publish: a full request queue drops the message instead of stalling the caller.
        self.client
            .try_publish(topic, qos, false, payload.to_vec())
            .map_err(|e| MqttError::Publish(e.to_string()))?;
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn subscribe(&self, filter: &str, qos: QoS) -> MqttResult<()> {
        self.client
            .subscribe(filter, qos)
            .await
            .map_err(|e| MqttError::Subscribe(e.to_string()))
    }
}
