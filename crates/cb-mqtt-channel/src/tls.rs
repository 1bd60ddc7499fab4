//! TLS configuration for broker connections.
//!
//! Loads the pinned CA certificate (and an optional client certificate/key
//! pair) from PEM files and configures rumqttc's TLS transport.

use rumqttc::{TlsConfiguration, Transport};

use crate::config::MqttConfig;
use crate::error::{MqttError, MqttResult};

/// Build a TLS transport from certificate file paths in the config.
///
/// Uses `TlsConfiguration::Simple` which reads PEM-encoded files:
/// - CA certificate the broker chain must verify against (required)
/// - Client certificate and private key (optional, both or neither)
pub fn load_tls_transport(config: &MqttConfig) -> MqttResult<Transport> {
    if config.ca_cert_path.is_empty() {
        return Err(MqttError::Tls("ca_cert_path is required when use_tls = true".into()));
    }

    let ca = std::fs::read(&config.ca_cert_path).map_err(|e| {
        MqttError::Tls(format!(
            "failed to read CA cert '{}': {e}",
            config.ca_cert_path
        ))
    })?;

    let client_auth = match (
        config.client_cert_path.is_empty(),
        config.client_key_path.is_empty(),
    ) {
        (true, true) => None,
        (false, false) => Some((
            read_pem(&config.client_cert_path, "client cert")?,
            read_pem(&config.client_key_path, "client key")?,
        )),
        _ => {
            return Err(MqttError::Config(
                "client_cert_path and client_key_path must be set together".into(),
            ));
        }
    };

    Ok(Transport::tls_with_config(TlsConfiguration::Simple {
        ca,
        alpn: None,
        client_auth,
    }))
}

fn read_pem(path: &str, what: &str) -> MqttResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| MqttError::Tls(format!("failed to read {what} '{path}': {e}")))
}

/// Transport without TLS (for local testing / dev mode).
pub fn plaintext_transport() -> Transport {
    Transport::Tcp
}
