//! Transport event sink.
//!
//! Consumes typed events pushed by the transport driver and logs them.
//! Purely observational: no reconnects, no republishing.

use tokio::sync::mpsc::UnboundedReceiver;

use cb_mqtt_channel::TransportEvent;
use cb_protocol::topics;

/// Counts of events seen by the sink.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SinkSummary {
    pub connected: u64,
    pub disconnected: u64,
    pub published: u64,
    pub data_received: u64,
    pub errors: u64,
}

impl SinkSummary {
    fn record(&mut self, event: &TransportEvent) {
        match event {
            TransportEvent::Connected => self.connected += 1,
            TransportEvent::Disconnected => self.disconnected += 1,
            TransportEvent::Published { .. } => self.published += 1,
            TransportEvent::DataReceived { .. } => self.data_received += 1,
            TransportEvent::Error { .. } => self.errors += 1,
        }
    }
}

/// Consume events until every sender is dropped.
pub async fn run(mut events: UnboundedReceiver<TransportEvent>) -> SinkSummary {
    let mut summary = SinkSummary::default();

    while let Some(event) = events.recv().await {
        handle_event(&event);
        summary.record(&event);
    }

    tracing::info!(summary = ?summary, "transport event stream closed");
    summary
}

/// Log a single transport event.
pub fn handle_event(event: &TransportEvent) {
    match event {
        TransportEvent::Connected => {
            tracing::info!("connected to mqtt broker");
        }
        TransportEvent::Disconnected => {
            tracing::info!("disconnected from mqtt broker");
        }
        TransportEvent::Published { id } => {
            tracing::info!(pkid = id, "publish acknowledged");
        }
        TransportEvent::DataReceived { topic, payload } => {
            tracing::info!(
                topic = %topic,
                phase = ?topics::parse_current(topic),
                payload = %String::from_utf8_lossy(payload),
                "message received"
            );
        }
        TransportEvent::Error { kind, message } => {
            tracing::error!(
                error_type = kind.code(),
                kind = kind.as_str(),
                error = %message,
                "mqtt transport error"
            );
        }
    }
}
