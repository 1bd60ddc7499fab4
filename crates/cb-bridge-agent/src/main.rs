//! Corriente bridge — reads a current sensor over UART and publishes the
//! readings to an MQTT broker over TLS.
//!
//! Wires the serial reader, the MQTT transport driver, the event sink and
//! the read/publish loop into a single edge binary.

use std::time::Duration;

use rumqttc::QoS;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use cb_bridge_agent::bridge::{Bridge, LoopSettings};
use cb_bridge_agent::config::BridgeConfig;
use cb_bridge_agent::event_sink;
use cb_bridge_agent::publisher::Publisher;
use cb_bridge_agent::synthetic::SyntheticReadings;
use cb_mqtt_channel::{Channel, MqttChannel, driver};
use cb_serial::TokioSerialReader;

const DEFAULT_CONFIG_PATH: &str = "/etc/corriente/bridge.toml";
const DEFAULT_LOG_FILTER: &str = "info,rumqttc=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .json()
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "cb-bridge-agent starting"
    );

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = BridgeConfig::from_file(&config_path)?;
    tracing::info!(
        broker = %config.mqtt.broker_host,
        port = config.mqtt.broker_port,
        uart = %config.uart.device,
        sensor_phase = %config.sensor.phase,
        "config loaded"
    );

    // ── UART ────────────────────────────────────────────────────
    let reader = TokioSerialReader::open(&config.uart)?;

    // ── MQTT channel ────────────────────────────────────────────
    let (channel, eventloop) = if config.mqtt.use_tls {
        MqttChannel::new(&config.mqtt)?
    } else {
        tracing::warn!("MQTT plaintext mode (no TLS)");
        MqttChannel::new_plaintext(&config.mqtt)?
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut transport = tokio::spawn(driver::run(
        eventloop,
        channel.session(),
        event_tx,
        Duration::from_secs(config.mqtt.reconnect_delay_secs),
    ));

    for filter in &config.mqtt.subscribe_topics {
        channel.subscribe(filter, QoS::AtLeastOnce).await?;
        tracing::info!(filter = %filter, "subscription requested");
    }

    // ── Read/publish loop ───────────────────────────────────────
    let synthetic = SyntheticReadings::from_config(&config.synthetic)?;
    let mut bridge = Bridge::new(
        reader,
        Publisher::new(&channel),
        synthetic,
        LoopSettings::from(&config),
    );

    tracing::info!("cb-bridge-agent ready");

    tokio::select! {
        () = bridge.run() => {
            tracing::error!("bridge loop exited unexpectedly");
        }
        summary = event_sink::run(event_rx) => {
            tracing::error!(summary = ?summary, "event sink exited unexpectedly");
        }
        result = &mut transport => {
            tracing::error!(result = ?result, "mqtt transport driver exited unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    transport.abort();
    tracing::info!("cb-bridge-agent stopped");
    Ok(())
}
