//! Shared test harness for E2E integration tests.
//!
//! Wires the bridge loop to a `MockSerialReader` and a `MockChannel`, and
//! provides a minimal in-process MQTT broker for transport tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use cb_bridge_agent::bridge::{Bridge, CycleReport, LoopSettings};
use cb_bridge_agent::publisher::Publisher;
use cb_bridge_agent::synthetic::{SyntheticConfig, SyntheticReadings};
use cb_mqtt_channel::{MockChannel, MqttConfig, TransportEvent};
use cb_protocol::{CurrentPayload, Phase, topics};
use cb_serial::MockSerialReader;

/// Fixed payload timestamp used by the harness clock.
pub const FIXED_TS: i64 = 1_700_000_000;

fn fixed_clock() -> i64 {
    FIXED_TS
}

/// Bridge wired to mocks on both ends.
pub struct TestHarness {
    /// Scripted UART; clones share the script with the bridge's reader.
    pub uart: MockSerialReader,
    /// Recorded MQTT traffic.
    pub mqtt: MockChannel,
    synthetic: Option<SyntheticConfig>,
    settings: LoopSettings,
}

impl TestHarness {
    /// Connected channel, default synthetic channels with a fixed seed.
    pub fn new() -> Self {
        Self {
            uart: MockSerialReader::new(),
            mqtt: MockChannel::new(),
            synthetic: Some(SyntheticConfig {
                seed: Some(42),
                ..SyntheticConfig::default()
            }),
            settings: LoopSettings::default(),
        }
    }

    /// Harness without synthetic readings.
    pub fn sensor_only() -> Self {
        Self {
            synthetic: None,
            ..Self::new()
        }
    }

    /// Harness whose channel has no session.
    pub fn disconnected() -> Self {
        Self {
            mqtt: MockChannel::disconnected(),
            ..Self::new()
        }
    }

    /// Run `n` cycles back to back and return their reports.
    pub async fn run_cycles(&self, n: usize) -> Vec<CycleReport> {
        let synthetic = self
            .synthetic
            .as_ref()
            .and_then(|config| SyntheticReadings::from_config(config).unwrap());
        let mut bridge = Bridge::new(
            self.uart.clone(),
            Publisher::with_clock(&self.mqtt, fixed_clock),
            synthetic,
            self.settings,
        );

        let mut reports = Vec::with_capacity(n);
        for _ in 0..n {
            reports.push(bridge.run_cycle().await);
        }
        reports
    }

    /// Decoded payloads published for `phase`, in order.
    pub fn payloads_for(&self, phase: Phase) -> Vec<CurrentPayload> {
        self.mqtt
            .published_to(&topics::current(phase))
            .iter()
            .map(|msg| CurrentPayload::from_slice(&msg.payload).unwrap())
            .collect()
    }
}

// ── Fake broker ─────────────────────────────────────────────────

/// CONNACK, session not present, return code 0.
pub const CONNACK_ACCEPTED: [u8; 4] = [0x20, 0x02, 0x00, 0x00];
/// CONNACK, return code 5 (not authorized).
pub const CONNACK_NOT_AUTHORIZED: [u8; 4] = [0x20, 0x02, 0x00, 0x05];

/// PUBACK for `pkid`.
pub fn puback(pkid: u16) -> [u8; 4] {
    let [hi, lo] = pkid.to_be_bytes();
    [0x40, 0x02, hi, lo]
}

/// Bind a listener on an ephemeral localhost port.
pub async fn bind_broker() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Accept one client and read its CONNECT packet.
pub async fn accept_client(listener: &TcpListener) -> TcpStream {
    let (mut stream, _) = listener.accept().await.unwrap();
    let packet = read_packet(&mut stream).await;
    assert_eq!(packet[0] >> 4, 1, "expected CONNECT, got {packet:02x?}");
    stream
}

/// Read one MQTT control packet (fixed header + remaining length).
pub async fn read_packet(stream: &mut TcpStream) -> Vec<u8> {
    let mut packet = vec![stream.read_u8().await.unwrap()];

    let mut remaining = 0usize;
    let mut shift = 0;
    loop {
        let byte = stream.read_u8().await.unwrap();
        packet.push(byte);
        remaining |= ((byte & 0x7f) as usize) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    let start = packet.len();
    packet.resize(start + remaining, 0);
    stream.read_exact(&mut packet[start..]).await.unwrap();
    packet
}

/// Send raw bytes to the client.
pub async fn send(stream: &mut TcpStream, bytes: &[u8]) {
    stream.write_all(bytes).await.unwrap();
    stream.flush().await.unwrap();
}

/// Plaintext config pointing at a local broker.
pub fn broker_config(addr: SocketAddr) -> MqttConfig {
    MqttConfig {
        broker_host: addr.ip().to_string(),
        broker_port: addr.port(),
        client_id: "corriente-e2e".into(),
        use_tls: false,
        ca_cert_path: String::new(),
        client_cert_path: String::new(),
        client_key_path: String::new(),
        username: None,
        password: None,
        keepalive_secs: 30,
        reconnect_delay_secs: 1,
        request_capacity: 16,
        subscribe_topics: Vec::new(),
    }
}

/// Wait for the next transport event, failing after 5s.
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for transport event")
        .expect("transport event channel closed")
}
