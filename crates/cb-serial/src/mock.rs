//! Mock serial reader for testing.
//!
//! Scripted chunks are handed out in FIFO order, one per `read_chunk` call.
//! Clones share the same script so a test can keep a handle while the
//! bridge owns the reader.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{SerialError, SerialResult};
use crate::reader::SerialReader;

#[derive(Default)]
struct Script {
    /// Queued results returned by `read_chunk`.
    chunks: VecDeque<SerialResult<Vec<u8>>>,
    /// Timeout passed to every `read_chunk` call.
    polls: Vec<Duration>,
}

/// Mock serial reader with scripted chunks and poll recording.
#[derive(Clone, Default)]
pub struct MockSerialReader {
    script: Arc<Mutex<Script>>,
}

impl MockSerialReader {
    /// Create a new mock with nothing queued (every poll times out).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with text lines.
    pub fn with_lines(lines: &[&str]) -> Self {
        let mock = Self::new();
        for line in lines {
            mock.queue_line(line);
        }
        mock
    }

    /// Queue a raw chunk.
    pub fn queue_chunk(&self, bytes: impl Into<Vec<u8>>) {
        self.script
            .lock()
            .unwrap()
            .chunks
            .push_back(Ok(bytes.into()));
    }

    /// Queue a newline-terminated text line.
    pub fn queue_line(&self, line: &str) {
        self.queue_chunk(format!("{line}\n"));
    }

    /// Queue an explicit timeout.
    pub fn queue_timeout(&self, timeout_ms: u64) {
        self.queue_error(SerialError::Timeout { timeout_ms });
    }

    /// Queue a driver error.
    pub fn queue_error(&self, error: SerialError) {
        self.script.lock().unwrap().chunks.push_back(Err(error));
    }

    /// Number of queued results not consumed yet.
    pub fn pending(&self) -> usize {
        self.script.lock().unwrap().chunks.len()
    }

    /// Timeouts passed to each poll so far.
    pub fn polls(&self) -> Vec<Duration> {
        self.script.lock().unwrap().polls.clone()
    }
}

#[async_trait]
impl SerialReader for MockSerialReader {
    async fn read_chunk(&mut self, timeout: Duration) -> SerialResult<Vec<u8>> {
        let mut script = self.script.lock().unwrap();
        script.polls.push(timeout);
        script.chunks.pop_front().unwrap_or(Err(SerialError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }))
    }
}
