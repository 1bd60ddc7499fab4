//! Synthetic reading generator (demo scaffolding).
//!
//! Feeds phases that have no real sensor attached with uniform
//! pseudo-random values. Disable it with `[synthetic] enabled = false`;
//! the UART path does not depend on it.

use anyhow::ensure;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use cb_protocol::Phase;

/// One synthetic phase and its half-open value range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SyntheticChannel {
    pub phase: Phase,
    pub min: f32,
    pub max: f32,
}

impl SyntheticChannel {
    pub fn new(phase: Phase, min: f32, max: f32) -> Self {
        Self { phase, min, max }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.min.is_finite() && self.max.is_finite() && self.min < self.max,
            "synthetic channel {}: range [{}, {}) is empty or not finite",
            self.phase,
            self.min,
            self.max
        );
        Ok(())
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..self.max).contains(&value)
    }
}

/// Generator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticConfig {
    /// Publish synthetic readings every cycle.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fixed RNG seed; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_channels")]
    pub channels: Vec<SyntheticChannel>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            seed: None,
            channels: default_channels(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_channels() -> Vec<SyntheticChannel> {
    vec![
        SyntheticChannel::new(Phase::Sala, 1.0, 1.5),
        SyntheticChannel::new(Phase::Garage, 2.6, 2.9),
    ]
}

/// Uniform pseudo-random readings for a fixed set of phases.
pub struct SyntheticReadings<R = StdRng> {
    rng: R,
    channels: Vec<SyntheticChannel>,
}

impl SyntheticReadings {
    pub fn new(channels: Vec<SyntheticChannel>, seed: Option<u64>) -> anyhow::Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(channels, rng)
    }

    /// Build from config; `None` when disabled.
    pub fn from_config(config: &SyntheticConfig) -> anyhow::Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(config.channels.clone(), config.seed).map(Some)
    }
}

impl<R: Rng> SyntheticReadings<R> {
    pub fn with_rng(channels: Vec<SyntheticChannel>, rng: R) -> anyhow::Result<Self> {
        for channel in &channels {
            channel.validate()?;
        }
        Ok(Self { rng, channels })
    }

    /// One value per channel, in channel order.
    pub fn sample(&mut self) -> Vec<(Phase, f32)> {
        self.channels
            .iter()
            .map(|c| (c.phase, below_max(self.rng.random_range(c.min..c.max), c)))
            .collect()
    }
}

// Float rounding in `random_range` can land exactly on `max`; pull it back
// to the closest representable value inside the range.
fn below_max(value: f32, channel: &SyntheticChannel) -> f32 {
    if value < channel.max {
        return value;
    }
    let max = channel.max;
    let prev = if max > 0.0 {
        f32::from_bits(max.to_bits() - 1)
    } else if max == 0.0 {
        -f32::from_bits(1)
    } else {
        f32::from_bits(max.to_bits() + 1)
    };
    prev.max(channel.min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    /// Always yields all-ones bits: the largest value every float sampler can produce.
    struct SaturatedRng;

    impl RngCore for SaturatedRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xff);
        }
    }

    #[test]
    fn default_ranges() {
        let config = SyntheticConfig::default();
        assert!(config.enabled);
        assert_eq!(
            config.channels,
            vec![
                SyntheticChannel::new(Phase::Sala, 1.0, 1.5),
                SyntheticChannel::new(Phase::Garage, 2.6, 2.9),
            ]
        );
    }

    #[test]
    fn samples_stay_in_range_for_many_seeds() {
        for seed in 0..200 {
            let mut generator = SyntheticReadings::new(default_channels(), Some(seed)).unwrap();
            for _ in 0..50 {
                let values = generator.sample();
                assert_eq!(values.len(), 2);
                let (sala_phase, sala) = values[0];
                let (garage_phase, garage) = values[1];
                assert_eq!(sala_phase, Phase::Sala);
                assert_eq!(garage_phase, Phase::Garage);
                assert!((1.0..1.5).contains(&sala), "sala out of range: {sala}");
                assert!((2.6..2.9).contains(&garage), "garage out of range: {garage}");
            }
        }
    }

    #[test]
    fn unseeded_generator_stays_in_range() {
        let mut generator = SyntheticReadings::new(default_channels(), None).unwrap();
        for _ in 0..1000 {
            for ((_, value), channel) in generator.sample().into_iter().zip(default_channels()) {
                assert!(channel.contains(value));
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SyntheticReadings::new(default_channels(), Some(7)).unwrap();
        let mut b = SyntheticReadings::new(default_channels(), Some(7)).unwrap();
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let channels = vec![SyntheticChannel::new(Phase::Sala, 1.5, 1.5)];
        assert!(SyntheticReadings::new(channels, Some(1)).is_err());

        let channels = vec![SyntheticChannel::new(Phase::Sala, f32::NAN, 1.5)];
        assert!(SyntheticReadings::new(channels, Some(1)).is_err());
    }

    #[test]
    fn disabled_config_yields_none() {
        let config = SyntheticConfig {
            enabled: false,
            ..SyntheticConfig::default()
        };
        assert!(SyntheticReadings::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn saturated_rng_stays_below_max() {
        let mut generator = SyntheticReadings::with_rng(default_channels(), SaturatedRng).unwrap();
        for _ in 0..10 {
            for ((phase, value), channel) in generator.sample().into_iter().zip(default_channels()) {
                assert_eq!(phase, channel.phase);
                assert!(value < channel.max, "{phase} hit the upper bound: {value}");
                assert!(channel.contains(value), "{phase} out of range: {value}");
            }
        }
    }

    #[test]
    fn upper_bound_is_pulled_inside() {
        let garage = SyntheticChannel::new(Phase::Garage, 2.6, 2.9);
        let value = below_max(2.9, &garage);
        assert!(garage.contains(value));
        assert!(2.9 - value < 1e-6);

        let negative = SyntheticChannel::new(Phase::Sala, -1.0, -0.5);
        assert!(negative.contains(below_max(-0.5, &negative)));

        let zero = SyntheticChannel::new(Phase::Sala, -1.0, 0.0);
        assert!(zero.contains(below_max(0.0, &zero)));

        assert_eq!(below_max(2.7, &garage), 2.7);
    }
}
