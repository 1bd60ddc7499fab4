use serde::Deserialize;

/// UART settings. Framing is fixed at 8N1 without flow control.
#[derive(Debug, Clone, Deserialize)]
pub struct SerialConfig {
    /// Serial device path (e.g., /dev/ttyUSB0, COM3).
    pub device: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read buffer size in bytes; at most `buffer_size - 1` bytes are read per poll.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// How long a single poll waits for data.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_buffer_size() -> usize {
    1024
}

fn default_read_timeout() -> u64 {
    1000
}
