//! Parser for sensor lines of the form `Current reading: <float> A`.
//!
//! The prefix must start the chunk. Whitespace around the number may be any
//! run of whitespace, newlines included, or none at all, so a reading split
//! across lines still parses. The unit must be followed by whitespace or the
//! end of the chunk; anything after that is ignored.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ParseError;

const PREFIX: &str = "Current reading:";
const UNIT: char = 'A';

// Decimal literal with optional sign, fraction and exponent ("1", "1.", ".5", "2.5e-1").
static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// Parse a raw chunk as delivered by the serial reader.
///
/// The chunk is cut at the first NUL byte and decoded lossily.
pub fn parse_chunk(bytes: &[u8]) -> Result<f32, ParseError> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    parse_reading(&String::from_utf8_lossy(&bytes[..end]))
}

/// Extract the current value from a text reading.
pub fn parse_reading(text: &str) -> Result<f32, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let rest = text
        .strip_prefix(PREFIX)
        .ok_or(ParseError::PatternMismatch)?
        .trim_start();

    let Some(number) = RE_NUMBER.find(rest) else {
        let token = rest.split_whitespace().next().unwrap_or_default();
        return Err(ParseError::InvalidNumber(token.to_string()));
    };
    let value: f32 = number
        .as_str()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(number.as_str().to_string()))?;

    let after_unit = rest[number.end()..]
        .trim_start()
        .strip_prefix(UNIT)
        .ok_or(ParseError::MissingUnit)?;
    if after_unit.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return Err(ParseError::MissingUnit);
    }

    if !value.is_finite() {
        return Err(ParseError::NonFinite);
    }

    Ok(value)
}
