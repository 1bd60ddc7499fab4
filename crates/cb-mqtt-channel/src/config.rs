use serde::Deserialize;

/// MQTT connection configuration, loadable from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttConfig {
    /// MQTT broker hostname (e.g., a HiveMQ Cloud cluster).
    pub broker_host: String,
    /// MQTT broker port (default 8883 for TLS).
    #[serde(default = "default_port")]
    pub broker_port: u16,
    /// MQTT client ID (should be unique per device).
    pub client_id: String,
    /// Enable TLS. When false, connects plaintext (local dev).
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// Path to the pinned CA certificate (PEM).
    #[serde(default)]
    pub ca_cert_path: String,
    /// Optional client certificate (PEM) for brokers requiring mTLS.
    #[serde(default)]
    pub client_cert_path: String,
    /// Optional client private key (PEM), paired with `client_cert_path`.
    #[serde(default)]
    pub client_key_path: String,
    /// Broker username.
    #[serde(default)]
    pub username: Option<String>,
    /// Broker password.
    #[serde(default)]
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u16,
    /// Pause before polling the event loop again after a connection error.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
    /// Capacity of the client request queue; publishes beyond it are dropped.
    #[serde(default = "default_request_capacity")]
    pub request_capacity: usize,
    /// Topic filters to subscribe to after start-up (inbound data is only logged).
    #[serde(default)]
    pub subscribe_topics: Vec<String>,
}

fn default_use_tls() -> bool {
    true
}

fn default_port() -> u16 {
    8883
}

fn default_keepalive() -> u16 {
    30
}

fn default_reconnect_delay() -> u64 {
    5
}

fn default_request_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: MqttConfig = toml::from_str(
            r#"
broker_host = "broker.example.com"
client_id = "bridge-01"
ca_cert_path = "/etc/corriente/ca.pem"
"#,
        )
        .unwrap();
        assert_eq!(config.broker_port, 8883);
        assert!(config.use_tls);
        assert_eq!(config.keepalive_secs, 30);
        assert_eq!(config.reconnect_delay_secs, 5);
        assert_eq!(config.request_capacity, 64);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.client_cert_path.is_empty());
        assert!(config.subscribe_topics.is_empty());
    }

    #[test]
    fn credentials_are_read() {
        let config: MqttConfig = toml::from_str(
            r#"
broker_host = "broker.example.com"
client_id = "bridge-01"
username = "casa"
password = "s3cret"
use_tls = false
broker_port = 1883
"#,
        )
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("casa"));
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert!(!config.use_tls);
        assert_eq!(config.broker_port, 1883);
    }
}
