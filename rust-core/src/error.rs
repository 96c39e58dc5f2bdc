//! Error types for the feature extraction pipeline
//!
//! DSP failures are scoped to a single segment and degrade that segment's
//! features. Configuration failures are fatal before the stream starts.

use thiserror::Error;

use crate::features::Feature;

/// Errors raised by the per-segment DSP stages
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Segment length {len} is not a power of two >= 2 within the engine size")]
    InvalidSegmentLength { len: usize },

    #[error("Transform output length {len} is odd; cannot pair real/imaginary parts")]
    OddTransformLength { len: usize },

    #[error("Cepstral transform received no log energies")]
    EmptyInput,

    #[error("Requested {requested} cepstral coefficients from {available} log energies")]
    InvalidCoefficientCount { requested: usize, available: usize },

    #[error("Feature `{0}` has no implementation")]
    UnsupportedFeature(Feature),

    #[error("Spectrum has {actual} bins, filterbank expects {expected}")]
    SpectrumLengthMismatch { expected: usize, actual: usize },

    #[error("Segment of {len} samples is too short, need at least {required}")]
    SegmentTooShort { len: usize, required: usize },

    #[error("Spectrum is unavailable for this segment")]
    SpectrumUnavailable,
}

/// Errors in the recording configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Sample rate must be greater than zero")]
    ZeroSampleRate,

    #[error("pointsPerSecond {points_per_second} yields segments shorter than 2 samples at {sample_rate} Hz")]
    InvalidPointsPerSecond {
        points_per_second: u32,
        sample_rate: u32,
    },

    #[error("Unsupported bit depth: {0} (expected 8, 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    #[error("Number of channels must be greater than zero")]
    ZeroChannels,

    #[error("Batch interval must be greater than zero")]
    ZeroInterval,

    #[error("Batch interval {interval_ms} ms exceeds the {max_ms} ms limit")]
    IntervalTooLong { interval_ms: u64, max_ms: u64 },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from the streaming processor
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Analysis worker panicked")]
    WorkerPanicked,
}

/// Result type alias for DSP operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
