//! Serial reader abstraction.
//!
//! `SerialReader` trait with a single windowed `read_chunk`. Two impls:
//! - `StreamReader<S>`, any `AsyncRead` stream; `TokioSerialReader` is the
//!   tokio-serial specialisation opened from a [`SerialConfig`]
//! - `MockSerialReader`, scripted chunks (in `mock.rs`)
//!
//! Bytes are never carried over between calls: whatever arrived inside one
//! window is returned as one chunk.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{Instant, timeout_at};
use tokio_serial::{
    DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits,
};

use crate::config::SerialConfig;
use crate::error::{SerialError, SerialResult};

/// Trait for serial input implementations.
#[async_trait]
pub trait SerialReader: Send {
    /// Collect bytes until the buffer is full or `timeout` elapses.
    ///
    /// Returns `SerialError::Timeout` when nothing arrived in the window.
    async fn read_chunk(&mut self, timeout: Duration) -> SerialResult<Vec<u8>>;
}

/// Windowed reader over an async byte stream.
pub struct StreamReader<S> {
    stream: S,
    /// Maximum bytes returned per chunk (buffer size minus the terminator slot).
    capacity: usize,
}

/// UART reader backed by tokio-serial.
pub type TokioSerialReader = StreamReader<SerialStream>;

impl<S> StreamReader<S> {
    /// Wrap a stream using a buffer of `buffer_size` bytes.
    pub fn new(stream: S, buffer_size: usize) -> Self {
        Self {
            stream,
            capacity: buffer_size.saturating_sub(1).max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl StreamReader<SerialStream> {
    /// Open the UART at the configured baud rate, 8N1, no flow control.
    pub fn open(config: &SerialConfig) -> SerialResult<Self> {
        let stream = tokio_serial::new(&config.device, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|e| SerialError::Open {
                device: config.device.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(
            device = %config.device,
            baud_rate = config.baud_rate,
            "serial port opened"
        );
        Ok(Self::new(stream, config.buffer_size))
    }
}

#[async_trait]
impl<S> SerialReader for StreamReader<S>
where
    S: AsyncRead + Unpin + Send,
{
    async fn read_chunk(&mut self, timeout: Duration) -> SerialResult<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut buf = vec![0u8; self.capacity];
        let mut filled = 0;

        while filled < self.capacity {
            match timeout_at(deadline, self.stream.read(&mut buf[filled..])).await {
                Ok(Ok(0)) => {
                    if filled == 0 {
                        return Err(SerialError::Closed);
                    }
                    break;
                }
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(SerialError::Io(e.to_string())),
                Err(_elapsed) => break,
            }
        }

        if filled == 0 {
            return Err(SerialError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        buf.truncate(filled);
        Ok(buf)
    }
}
