//! MQTT topic builders and parsers for the house topic hierarchy.
//!
//! Topic structure:
//! ```text
//! casa/{phase}/corriente
//! ```

use crate::phase::Phase;

const PREFIX: &str = "casa";
const MEASUREMENT: &str = "corriente";

/// Topic carrying current readings for one phase.
pub fn current(phase: Phase) -> String {
    format!("{PREFIX}/{phase}/{MEASUREMENT}")
}

/// Subscribe to current readings of every phase.
pub fn all_currents() -> String {
    format!("{PREFIX}/+/{MEASUREMENT}")
}

/// Extract the phase from a current topic.
/// Returns `None` if the topic doesn't match the expected format.
pub fn parse_current(topic: &str) -> Option<Phase> {
    let mut parts = topic.split('/');

    if parts.next() != Some(PREFIX) {
        return None;
    }
    let phase = parts.next()?.parse().ok()?;
    if parts.next() != Some(MEASUREMENT) || parts.next().is_some() {
        return None;
    }

    Some(phase)
}
