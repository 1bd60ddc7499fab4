//! Main read → parse → publish loop.
//!
//! Each cycle polls the UART once, publishes the parsed sensor value (if
//! any) and then one synthetic reading per configured channel, whatever
//! happened on the UART. `run` repeats cycles forever with a fixed pause.

use std::time::Duration;

use cb_mqtt_channel::{Channel, MessageId};
use cb_protocol::Phase;
use cb_serial::{ParseError, SerialError, SerialReader, parse_chunk};

use crate::config::BridgeConfig;
use crate::publisher::Publisher;
use crate::synthetic::SyntheticReadings;

/// Loop timing and routing.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Phase real sensor readings are published under.
    pub sensor_phase: Phase,
    /// Wait window for one UART poll.
    pub read_timeout: Duration,
    /// Pause after each cycle.
    pub interval: Duration,
}

impl From<&BridgeConfig> for LoopSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            sensor_phase: config.sensor.phase,
            read_timeout: Duration::from_millis(config.uart.read_timeout_ms),
            interval: Duration::from_secs(config.publish_interval_secs),
        }
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            sensor_phase: Phase::Cocina,
            read_timeout: Duration::from_secs(1),
            interval: Duration::from_secs(5),
        }
    }
}

/// What the UART poll produced in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorOutcome {
    Reading(f32),
    NoData,
    ParseFailed(ParseError),
    ReadFailed(String),
}

/// One publish attempt made during a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublishAttempt {
    pub phase: Phase,
    pub value: f32,
    pub msg_id: Option<MessageId>,
}

/// Summary of one loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub sensor: SensorOutcome,
    pub attempts: Vec<PublishAttempt>,
}

impl CycleReport {
    /// Attempts the channel accepted.
    pub fn published(&self) -> usize {
        self.attempts.iter().filter(|a| a.msg_id.is_some()).count()
    }
}

/// The bridge main loop.
pub struct Bridge<'a, R: SerialReader, C: Channel + ?Sized> {
    reader: R,
    publisher: Publisher<'a, C>,
    synthetic: Option<SyntheticReadings>,
    settings: LoopSettings,
}

impl<'a, R: SerialReader, C: Channel + ?Sized> Bridge<'a, R, C> {
    pub fn new(
        reader: R,
        publisher: Publisher<'a, C>,
        synthetic: Option<SyntheticReadings>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            reader,
            publisher,
            synthetic,
            settings,
        }
    }

    /// Run cycles forever, pausing `interval` after each.
    pub async fn run(&mut self) {
        tracing::info!(
            sensor_phase = %self.settings.sensor_phase,
            interval_secs = self.settings.interval.as_secs(),
            synthetic = self.synthetic.is_some(),
            "bridge loop started"
        );

        loop {
            let report = self.run_cycle().await;
            tracing::debug!(
                attempts = report.attempts.len(),
                published = report.published(),
                "cycle finished"
            );
            tokio::time::sleep(self.settings.interval).await;
        }
    }

    /// One read → parse → publish iteration, without the trailing pause.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut attempts = Vec::new();
        let sensor = self.poll_sensor().await;

        if let SensorOutcome::Reading(value) = sensor {
            let phase = self.settings.sensor_phase;
            let msg_id = self.publisher.publish(phase, value).await;
            attempts.push(PublishAttempt {
                phase,
                value,
                msg_id,
            });
        }

        let samples = self
            .synthetic
            .as_mut()
            .map(SyntheticReadings::sample)
            .unwrap_or_default();
        for (phase, value) in samples {
            tracing::debug!(phase = %phase, value, "synthetic reading");
            let msg_id = self.publisher.publish(phase, value).await;
            attempts.push(PublishAttempt {
                phase,
                value,
                msg_id,
            });
        }

        CycleReport { sensor, attempts }
    }

    async fn poll_sensor(&mut self) -> SensorOutcome {
        match self.reader.read_chunk(self.settings.read_timeout).await {
            Ok(chunk) => match parse_chunk(&chunk) {
                Ok(value) => SensorOutcome::Reading(value),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        raw = %String::from_utf8_lossy(&chunk),
                        "could not parse uart input"
                    );
                    SensorOutcome::ParseFailed(e)
                }
            },
            Err(SerialError::Timeout { timeout_ms }) => {
                tracing::warn!(timeout_ms, "no uart data within timeout");
                SensorOutcome::NoData
            }
            Err(e) => {
                tracing::error!(error = %e, "uart read failed");
                SensorOutcome::ReadFailed(e.to_string())
            }
        }
    }
}
