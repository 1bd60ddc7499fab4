//! Shared connection flag for one MQTT session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the broker session is currently established.
///
/// Cloned into the channel (readers) and the transport driver (writer).
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    connected: Arc<AtomicBool>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Update the flag, returning the previous value.
    pub fn set_connected(&self, connected: bool) -> bool {
        self.connected.swap(connected, Ordering::AcqRel)
    }
}
