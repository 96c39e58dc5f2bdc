//! Amplitude summaries for one segment

use serde::{Deserialize, Serialize};

/// Floor used before converting a linear level to dB
pub const DB_FLOOR: f32 = 1e-10;

/// Amplitude summary strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmplitudeAlgorithm {
    /// Root mean square of the samples
    #[default]
    Rms,

    /// Largest absolute sample
    Peak,
}

impl AmplitudeAlgorithm {
    /// Summarize a segment as one non-negative level
    pub fn measure(&self, samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        match self {
            AmplitudeAlgorithm::Rms => {
                let sum_of_squares: f32 = samples.iter().map(|&s| s * s).sum();
                (sum_of_squares / samples.len() as f32).sqrt()
            }
            AmplitudeAlgorithm::Peak => samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max),
        }
    }
}

/// Convert a linear amplitude to dB: `20 * log10(max(amplitude, 1e-10))`
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.max(DB_FLOOR).log10()
}
