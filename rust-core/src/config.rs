//! Recording configuration
//!
//! Set once at stream start. Every field is validated before any sample is
//! processed so configuration mistakes never surface mid-stream.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::audio::amplitude::AmplitudeAlgorithm;
use crate::error::ConfigError;
use crate::features::Feature;
use crate::spectrum::windowing::WindowType;

/// Default emission rate of data points
pub const DEFAULT_POINTS_PER_SECOND: u32 = 20;

/// Default batch delivery period in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// Longest accepted batch delivery period in milliseconds
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Number of triangular filters in the Mel filterbank
pub const NUM_MEL_FILTERS: usize = 26;

/// Number of cepstral coefficients kept per segment
pub const NUM_MFCC_COEFFICIENTS: usize = 13;

/// Bit depths accepted for raw PCM input
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// Stream configuration delivered by the capture collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Bit depth of the raw PCM input
    pub bit_depth: u16,

    /// Interleaved channel count of the raw PCM input
    pub number_of_channels: u16,

    /// Data points emitted per second of audio
    pub points_per_second: u32,

    /// Amplitude summary strategy
    pub algorithm: AmplitudeAlgorithm,

    /// Requested named feature extractors
    pub features: BTreeSet<Feature>,

    /// Batch delivery period in milliseconds
    #[serde(rename = "interval")]
    pub interval_ms: u64,

    /// Analysis window applied before the FFT
    pub window: WindowType,

    /// Level below which a segment is reported as silent
    pub silence_threshold_db: f32,

    /// Level at which the speech gate opens
    pub speech_threshold_db: f32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bit_depth: 32,
            number_of_channels: 1,
            points_per_second: DEFAULT_POINTS_PER_SECOND,
            algorithm: AmplitudeAlgorithm::default(),
            features: BTreeSet::new(),
            interval_ms: DEFAULT_INTERVAL_MS,
            window: WindowType::Rectangular,
            silence_threshold_db: -50.0,
            speech_threshold_db: -35.0,
        }
    }
}

impl RecordingConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that would otherwise fail mid-stream
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.points_per_second == 0 || self.sample_rate / self.points_per_second < 2 {
            return Err(ConfigError::InvalidPointsPerSecond {
                points_per_second: self.points_per_second,
                sample_rate: self.sample_rate,
            });
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(ConfigError::UnsupportedBitDepth(self.bit_depth));
        }
        if self.number_of_channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.interval_ms > MAX_INTERVAL_MS {
            return Err(ConfigError::IntervalTooLong {
                interval_ms: self.interval_ms,
                max_ms: MAX_INTERVAL_MS,
            });
        }
        Ok(())
    }

    /// Samples per analysis segment (floor of `sample_rate / points_per_second`)
    ///
    /// Only meaningful on a validated config.
    pub fn segment_length(&self) -> usize {
        (self.sample_rate / self.points_per_second.max(1)) as usize
    }

    /// Builder-style helper to request a feature
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecordingConfig::default();
        assert_eq!(config.points_per_second, 20);
        assert_eq!(config.interval_ms, 500);
        assert_eq!(config.algorithm, AmplitudeAlgorithm::Rms);
        assert!(config.features.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_segment_length_floors() {
        let config = RecordingConfig {
            sample_rate: 16000,
            points_per_second: 20,
            ..Default::default()
        };
        assert_eq!(config.segment_length(), 800);

        let config = RecordingConfig {
            sample_rate: 44100,
            points_per_second: 30,
            ..Default::default()
        };
        // 1470 exactly
        assert_eq!(config.segment_length(), 1470);

        let config = RecordingConfig {
            sample_rate: 44100,
            points_per_second: 40,
            ..Default::default()
        };
        // 1102.5 floors to 1102
        assert_eq!(config.segment_length(), 1102);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let config = RecordingConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSampleRate)));
    }

    #[test]
    fn test_points_per_second_rejected() {
        let zero = RecordingConfig {
            points_per_second: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidPointsPerSecond { .. })
        ));

        let too_many = RecordingConfig {
            sample_rate: 100,
            points_per_second: 60,
            ..Default::default()
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConfigError::InvalidPointsPerSecond { .. })
        ));
    }

    #[test]
    fn test_bit_depth_and_channels_rejected() {
        let config = RecordingConfig {
            bit_depth: 12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedBitDepth(12))
        ));

        let config = RecordingConfig {
            number_of_channels: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChannels)));

        let config = RecordingConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_interval_upper_bound() {
        let config = RecordingConfig {
            interval_ms: MAX_INTERVAL_MS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = RecordingConfig {
            interval_ms: u64::MAX / 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalTooLong {
                max_ms: MAX_INTERVAL_MS,
                ..
            })
        ));
    }

    #[test]
    fn test_from_toml() {
        let content = r#"
            sampleRate = 48000
            pointsPerSecond = 50
            algorithm = "peak"
            features = ["mfcc", "spectralCentroid"]
            interval = 250
            window = "hann"
        "#;
        let config = RecordingConfig::from_toml_str(content).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.points_per_second, 50);
        assert_eq!(config.algorithm, AmplitudeAlgorithm::Peak);
        assert_eq!(config.interval_ms, 250);
        assert_eq!(config.window, WindowType::Hann);
        assert!(config.features.contains(&Feature::Mfcc));
        assert!(config.features.contains(&Feature::SpectralCentroid));
        // Unset keys keep defaults
        assert_eq!(config.number_of_channels, 1);
    }

    #[test]
    fn test_from_toml_unknown_feature() {
        let result = RecordingConfig::from_toml_str(r#"features = ["loudness"]"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_toml_invalid_values() {
        let result = RecordingConfig::from_toml_str("sampleRate = 0");
        assert!(matches!(result, Err(ConfigError::ZeroSampleRate)));
    }
}
