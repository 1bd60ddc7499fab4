//! Mock MQTT channel for testing without a real broker.
//!
//! Publishes and subscriptions are kept in memory for assertions. The
//! connection flag is settable so tests can exercise the "no session"
//! path, and publishes can be forced to fail like a full request queue.

use async_trait::async_trait;
use rumqttc::QoS;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::channel::{Channel, MessageId};
use crate::error::{MqttError, MqttResult};

/// A recorded publish call.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub id: MessageId,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
}

#[derive(Default)]
struct Recorded {
    published: Vec<PublishedMessage>,
    subscriptions: Vec<(String, QoS)>,
}

/// In-memory `Channel` that records traffic instead of sending it.
pub struct MockChannel {
    recorded: Mutex<Recorded>,
    connected: AtomicBool,
    reject_publishes: AtomicBool,
}

impl MockChannel {
    /// A connected mock.
    pub fn new() -> Self {
        Self {
            recorded: Mutex::default(),
            connected: AtomicBool::new(true),
            reject_publishes: AtomicBool::new(false),
        }
    }

    /// A mock whose session is not established.
    pub fn disconnected() -> Self {
        let mock = Self::new();
        mock.set_connected(false);
        mock
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make every publish fail as if the request queue were full.
    pub fn set_reject_publishes(&self, reject: bool) {
        self.reject_publishes.store(reject, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.recorded.lock().unwrap().published.clone()
    }

    pub fn last_published(&self) -> Option<PublishedMessage> {
        self.recorded.lock().unwrap().published.last().cloned()
    }

    /// Messages sent to exactly `topic`, in publish order.
    pub fn published_to(&self, topic: &str) -> Vec<PublishedMessage> {
        let recorded = self.recorded.lock().unwrap();
        recorded
            .published
            .iter()
            .filter(|m| m.topic == topic)
            .cloned()
            .collect()
    }

    pub fn is_subscribed_to(&self, filter: &str) -> bool {
        let recorded = self.recorded.lock().unwrap();
        recorded.subscriptions.iter().any(|(f, _)| f == filter)
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish(&self, topic: &str, payload: &[u8], qos: QoS) -> MqttResult<MessageId> {
        if self.reject_publishes.load(Ordering::SeqCst) {
            return Err(MqttError::Publish("request queue full".into()));
        }

        let mut recorded = self.recorded.lock().unwrap();
        let id = recorded.published.len() as MessageId + 1;
        recorded.published.push(PublishedMessage {
            id,
            topic: topic.to_string(),
            payload: payload.to_vec(),
            qos,
        });
        Ok(id)
    }

    async fn subscribe(&self, filter: &str, qos: QoS) -> MqttResult<()> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.subscriptions.push((filter.to_string(), qos));
        Ok(())
    }
}
