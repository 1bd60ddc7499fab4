//! Bridge configuration, loadable from TOML.

use anyhow::{Context, ensure};
use serde::Deserialize;

use cb_mqtt_channel::MqttConfig;
use cb_protocol::Phase;
use cb_serial::SerialConfig;

use crate::synthetic::SyntheticConfig;

/// Top-level configuration for the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// MQTT connection settings.
    pub mqtt: MqttConfig,
    /// UART the current sensor is attached to.
    pub uart: SerialConfig,
    /// Where real sensor readings are published.
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Demo readings for phases without a sensor.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// Pause after each read/publish cycle, in seconds.
    #[serde(default = "default_publish_interval")]
    pub publish_interval_secs: u64,
}

/// Real sensor settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_sensor_phase")]
    pub phase: Phase,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            phase: default_sensor_phase(),
        }
    }
}

fn default_sensor_phase() -> Phase {
    Phase::Cocina
}

fn default_publish_interval() -> u64 {
    5
}

impl BridgeConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config file '{path}'"))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.uart.buffer_size >= 2,
            "uart.buffer_size must be at least 2 (got {})",
            self.uart.buffer_size
        );
        ensure!(self.uart.read_timeout_ms > 0, "uart.read_timeout_ms must be > 0");
        ensure!(self.publish_interval_secs > 0, "publish_interval_secs must be > 0");
        for channel in &self.synthetic.channels {
            channel.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticChannel;

    const MINIMAL: &str = r#"
[mqtt]
broker_host = "abc123.s1.eu.hivemq.cloud"
client_id = "corriente-01"
ca_cert_path = "/etc/corriente/hivemq_root_ca.pem"
username = "casa"
password = "s3cret"

[uart]
device = "/dev/ttyUSB0"
"#;

    #[test]
    fn deserialize_minimal_config() {
        let config = BridgeConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.mqtt.broker_port, 8883); // default
        assert!(config.mqtt.use_tls);
        assert_eq!(config.uart.baud_rate, 115_200);
        assert_eq!(config.uart.read_timeout_ms, 1000);
        assert_eq!(config.sensor.phase, Phase::Cocina);
        assert_eq!(config.publish_interval_secs, 5);
        assert!(config.synthetic.enabled);
        assert_eq!(config.synthetic.channels.len(), 2);
        assert!(config.synthetic.seed.is_none());
    }

    #[test]
    fn deserialize_full_config() {
        let toml = r#"
publish_interval_secs = 10

[mqtt]
broker_host = "localhost"
broker_port = 1883
client_id = "bench"
use_tls = false
keepalive_secs = 60
subscribe_topics = ["casa/+/corriente"]

[uart]
device = "/dev/ttyAMA0"
baud_rate = 9600
buffer_size = 256
read_timeout_ms = 500

[sensor]
phase = "Garage"

[synthetic]
seed = 42

[[synthetic.channels]]
phase = "Sala"
min = 0.5
max = 0.75
"#;
        let config = BridgeConfig::from_toml(toml).unwrap();
        assert_eq!(config.publish_interval_secs, 10);
        assert!(!config.mqtt.use_tls);
        assert_eq!(config.mqtt.keepalive_secs, 60);
        assert_eq!(config.mqtt.subscribe_topics, vec!["casa/+/corriente"]);
        assert_eq!(config.uart.baud_rate, 9600);
        assert_eq!(config.uart.buffer_size, 256);
        assert_eq!(config.sensor.phase, Phase::Garage);
        assert_eq!(config.synthetic.seed, Some(42));
        assert_eq!(
            config.synthetic.channels,
            vec![SyntheticChannel::new(Phase::Sala, 0.5, 0.75)]
        );
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let toml = format!("{MINIMAL}\n[sensor]\nphase = \"Bano\"\n");
        assert!(BridgeConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn tiny_buffer_is_rejected() {
        let toml = MINIMAL.replace(
            "device = \"/dev/ttyUSB0\"",
            "device = \"/dev/ttyUSB0\"\nbuffer_size = 1",
        );
        let err = BridgeConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("buffer_size"));
    }

    #[test]
    fn inverted_synthetic_range_is_rejected() {
        let toml = format!(
            "{MINIMAL}\n[[synthetic.channels]]\nphase = \"Sala\"\nmin = 2.0\nmax = 1.0\n"
        );
        assert!(BridgeConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = BridgeConfig::from_file("/nonexistent/bridge.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/bridge.toml"));
    }
}
