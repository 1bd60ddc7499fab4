//! Serial input for the current bridge.
//!
//! - `SerialReader` trait: windowed "read up to N bytes with timeout"
//! - `TokioSerialReader` for real UART devices (tokio-serial)
//! - `MockSerialReader` with scripted chunks for tests
//! - `parse_reading` / `parse_chunk` for `Current reading: <float> A` lines

pub mod config;
pub mod error;
pub mod mock;
pub mod parser;
pub mod reader;

// Re-exports for convenience.
pub use config::SerialConfig;
pub use error::{ParseError, SerialError, SerialResult};
pub use mock::MockSerialReader;
pub use parser::{parse_chunk, parse_reading};
pub use reader::{SerialReader, StreamReader, TokioSerialReader};
