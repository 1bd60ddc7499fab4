use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Electrical phase (circuit) a reading belongs to.
///
/// The label is used verbatim as the middle segment of the topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Cocina,
    Sala,
    Garage,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Cocina, Phase::Sala, Phase::Garage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Cocina => "Cocina",
            Phase::Sala => "Sala",
            Phase::Garage => "Garage",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownPhase(s.to_string()))
    }
}
