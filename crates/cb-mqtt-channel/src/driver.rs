//! MQTT event loop driver.
//!
//! Polls the rumqttc event loop forever, keeps the session flag in sync
//! and pushes classified [`TransportEvent`]s to whoever listens.
//! Reconnection is rumqttc's: polling again after an error redials.

use std::time::Duration;

use rumqttc::{ConnectionError, EventLoop};
use tokio::sync::mpsc::UnboundedSender;

use crate::events::{TransportEvent, classify, classify_error};
use crate::session::SessionState;

/// Drive the event loop, forwarding typed events.
///
/// Runs forever until the task is cancelled. A closed receiver is not an
/// error; events are then simply dropped.
pub async fn run(
    mut eventloop: EventLoop,
    session: SessionState,
    events: UnboundedSender<TransportEvent>,
    reconnect_delay: Duration,
) {
    tracing::info!("mqtt transport driver started");

    loop {
        match eventloop.poll().await {
            Ok(event) => match classify(&event) {
                Some(classified) => {
                    apply(&session, &classified);
                    forward(&events, classified);
                }
                None => tracing::debug!(event = ?event, "mqtt event"),
            },
            Err(e) => {
                for event in on_error(&session, &e) {
                    forward(&events, event);
                }
                tracing::warn!(
                    error = %e,
                    delay_secs = reconnect_delay.as_secs(),
                    "mqtt event loop error, polling again after delay"
                );
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}

/// Update the session flag for a classified event.
pub fn apply(session: &SessionState, event: &TransportEvent) {
    match event {
        TransportEvent::Connected => {
            session.set_connected(true);
        }
        TransportEvent::Disconnected | TransportEvent::Error { .. } => {
            session.set_connected(false);
        }
        TransportEvent::Published { .. } | TransportEvent::DataReceived { .. } => {}
    }
}

/// Events to emit for a poll failure: the error, then `Disconnected` if the
/// session was up.
pub fn on_error(session: &SessionState, error: &ConnectionError) -> Vec<TransportEvent> {
    let mut events = vec![classify_error(error)];
    if session.set_connected(false) {
        events.push(TransportEvent::Disconnected);
    }
    events
}

fn forward(events: &UnboundedSender<TransportEvent>, event: TransportEvent) {
    if events.send(event).is_err() {
        tracing::debug!("transport event receiver closed, dropping event");
    }
}
