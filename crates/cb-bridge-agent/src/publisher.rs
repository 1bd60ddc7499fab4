//! Reading publisher.
//!
//! Turns a (phase, value) pair into a topic + JSON payload and hands it
//! to the channel at QoS 1. Fire-and-forget: nothing is queued or retried
//! here, failures only produce a log line.

use rumqttc::QoS;

use cb_mqtt_channel::{Channel, MessageId};
use cb_protocol::{Phase, Reading, unix_now};

/// Publishes current readings through a [`Channel`].
pub struct Publisher<'a, C: Channel + ?Sized> {
    channel: &'a C,
    clock: fn() -> i64,
}

impl<'a, C: Channel + ?Sized> Publisher<'a, C> {
    pub fn new(channel: &'a C) -> Self {
        Self::with_clock(channel, unix_now)
    }

    /// Use a custom unix-seconds source for payload timestamps.
    pub fn with_clock(channel: &'a C, clock: fn() -> i64) -> Self {
        Self { channel, clock }
    }

    /// Publish one reading.
    ///
    /// Returns the channel's message id, or `None` when the publish was
    /// skipped (no session) or dropped (encode or channel error).
    pub async fn publish(&self, phase: Phase, value: f32) -> Option<MessageId> {
        if !self.channel.is_connected() {
            tracing::warn!(phase = %phase, "mqtt session not established, skipping publish");
            return None;
        }

        let reading = Reading::new(phase, value, (self.clock)());
        let topic = reading.topic();
        let payload = match reading.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(phase = %phase, error = %e, "failed to encode reading");
                return None;
            }
        };

        match self.channel.publish(&topic, &payload, QoS::AtLeastOnce).await {
            Ok(msg_id) => {
                tracing::info!(
                    msg_id,
                    topic = %topic,
                    payload = %String::from_utf8_lossy(&payload),
                    "published"
                );
                Some(msg_id)
            }
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "publish dropped");
                None
            }
        }
    }
}
