//! Current readings and their JSON wire payload.
//!
//! Payload format (field order fixed, no whitespace):
//! ```text
//! {"ts":1700000000,"I":1.23}
//! ```
//! `ts` is unix seconds, `I` is RMS current in amperes with exactly two
//! fractional digits.

use chrono::Utc;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::{ProtocolError, ProtocolResult};
use crate::phase::Phase;
use crate::topics;

/// A single current measurement for one phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub phase: Phase,
    /// RMS current in amperes.
    pub value: f32,
    /// Unix seconds at publish time.
    pub timestamp: i64,
}

impl Reading {
    pub fn new(phase: Phase, value: f32, timestamp: i64) -> Self {
        Self {
            phase,
            value,
            timestamp,
        }
    }

    pub fn topic(&self) -> String {
        topics::current(self.phase)
    }

    pub fn payload(&self) -> CurrentPayload {
        CurrentPayload {
            ts: self.timestamp,
            current: f64::from(self.value),
        }
    }

    /// Encode the JSON payload bytes.
    pub fn to_payload(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(&self.payload()).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }
}

/// Current wall-clock time in unix seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// JSON body published for every reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentPayload {
    pub ts: i64,
    #[serde(rename = "I", serialize_with = "two_decimals")]
    pub current: f64,
}

impl CurrentPayload {
    pub fn from_slice(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProtocolError::Serialization(e.to_string()))
    }
}

fn two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "current value {value} is not a finite number"
        )));
    }
    let raw = RawValue::from_string(format!("{value:.2}")).map_err(serde::ser::Error::custom)?;
    raw.serialize(serializer)
}
