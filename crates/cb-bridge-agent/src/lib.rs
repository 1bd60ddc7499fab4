//! Corriente bridge agent: library crate for the UART → MQTT bridge.
//!
//! Re-exports all modules so external crates (e.g. `cb-e2e-tests`) can
//! drive the loop with mock readers and channels.

pub mod bridge;
pub mod config;
pub mod event_sink;
pub mod publisher;
pub mod synthetic;
