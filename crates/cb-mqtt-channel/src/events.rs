//! Typed transport notifications.
//!
//! Maps raw rumqttc events and connection errors onto the handful of
//! notifications the bridge cares about. Everything else (pings, acks for
//! subscriptions, outgoing bookkeeping) is dropped here.

use rumqttc::{ConnectReturnCode, ConnectionError, Event, Incoming, Outgoing};

/// A classified transport notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Broker accepted the connection.
    Connected,
    /// Session ended (broker or client side, or after an error).
    Disconnected,
    /// Broker acknowledged a QoS 1 publish with this packet id.
    Published { id: u16 },
    /// Inbound message on a subscribed topic.
    DataReceived { topic: String, payload: Vec<u8> },
    /// Connection-level failure reported by the event loop.
    Error {
        kind: TransportErrorKind,
        message: String,
    },
}

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Tls,
    Io,
    ConnectionRefused,
    NetworkTimeout,
    Protocol,
    Other,
}

impl TransportErrorKind {
    /// Stable numeric code for log lines.
    pub fn code(&self) -> i32 {
        match self {
            TransportErrorKind::Other => 0,
            TransportErrorKind::Tls => 1,
            TransportErrorKind::Io => 2,
            TransportErrorKind::ConnectionRefused => 3,
            TransportErrorKind::NetworkTimeout => 4,
            TransportErrorKind::Protocol => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Tls => "tls",
            TransportErrorKind::Io => "io",
            TransportErrorKind::ConnectionRefused => "connection_refused",
            TransportErrorKind::NetworkTimeout => "network_timeout",
            TransportErrorKind::Protocol => "protocol",
            TransportErrorKind::Other => "other",
        }
    }
}

/// Classify a raw event-loop event.
///
/// Returns `None` for events that carry nothing for the bridge.
pub fn classify(event: &Event) -> Option<TransportEvent> {
    match event {
        Event::Incoming(Incoming::ConnAck(ack)) if ack.code == ConnectReturnCode::Success => {
            Some(TransportEvent::Connected)
        }
        Event::Incoming(Incoming::ConnAck(ack)) => Some(TransportEvent::Error {
            kind: TransportErrorKind::ConnectionRefused,
            message: format!("{:?}", ack.code),
        }),
        Event::Incoming(Incoming::Disconnect) | Event::Outgoing(Outgoing::Disconnect) => {
            Some(TransportEvent::Disconnected)
        }
        Event::Incoming(Incoming::PubAck(ack)) => Some(TransportEvent::Published { id: ack.pkid }),
        Event::Incoming(Incoming::Publish(publish)) => Some(TransportEvent::DataReceived {
            topic: publish.topic.clone(),
            payload: publish.payload.to_vec(),
        }),
        _ => None,
    }
}

/// Classify an event-loop poll failure.
pub fn classify_error(error: &ConnectionError) -> TransportEvent {
    let kind = match error {
        ConnectionError::Tls(_) => TransportErrorKind::Tls,
        ConnectionError::Io(_) => TransportErrorKind::Io,
        ConnectionError::ConnectionRefused(_) => TransportErrorKind::ConnectionRefused,
        ConnectionError::NetworkTimeout | ConnectionError::FlushTimeout => {
            TransportErrorKind::NetworkTimeout
        }
        ConnectionError::MqttState(_) | ConnectionError::NotConnAck(_) => {
            TransportErrorKind::Protocol
        }
        _ => TransportErrorKind::Other,
    };

    TransportEvent::Error {
        kind,
        message: error.to_string(),
    }
}
