//! Harmonic-to-noise ratio from the normalized autocorrelation
//!
//! The strongest normalized autocorrelation peak `r` within the pitch lag
//! range gives `HNR = 10 * log10(r / (1 - r))` in dB.

use super::{Feature, FeatureExtractor, FeatureValue, SegmentView};
use crate::error::{AnalysisError, Result};

/// Clamp for the correlation peak, bounds HNR to about ±60 dB
const R_CLAMP: f32 = 1e-6;

/// Autocorrelation HNR over a pitch range
pub struct HnrExtractor {
    min_pitch_hz: f32,
    max_pitch_hz: f32,
}

impl Default for HnrExtractor {
    fn default() -> Self {
        Self {
            min_pitch_hz: 75.0,
            max_pitch_hz: 500.0,
        }
    }
}

impl HnrExtractor {
    /// Compute HNR in dB for one segment
    pub fn hnr(&self, samples: &[f32], sample_rate: u32) -> Result<f32> {
        let len = samples.len();
        let min_lag = ((sample_rate as f32 / self.max_pitch_hz) as usize).max(1);
        let max_lag = ((sample_rate as f32 / self.min_pitch_hz) as usize).min(len / 2);
        if max_lag <= min_lag {
            return Err(AnalysisError::SegmentTooShort {
                len,
                required: 2 * (min_lag + 1),
            });
        }

        let mean = samples.iter().sum::<f32>() / len as f32;
        let centered: Vec<f32> = samples.iter().map(|&s| s - mean).collect();

        let mut best = 0.0f32;
        for lag in min_lag..=max_lag {
            let (head, tail) = (&centered[..len - lag], &centered[lag..]);
            let cross: f32 = head.iter().zip(tail).map(|(a, b)| a * b).sum();
            let energy_head: f32 = head.iter().map(|a| a * a).sum();
            let energy_tail: f32 = tail.iter().map(|b| b * b).sum();
            let norm = (energy_head * energy_tail).sqrt();
            if norm > 0.0 {
                best = best.max(cross / norm);
            }
        }

        let r = best.clamp(R_CLAMP, 1.0 - R_CLAMP);
        Ok(10.0 * (r / (1.0 - r)).log10())
    }
}

impl FeatureExtractor for HnrExtractor {
    fn feature(&self) -> Feature {
        Feature::Hnr
    }

    fn needs_spectrum(&self) -> bool {
        false
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Scalar(
            self.hnr(segment.samples(), segment.sample_rate())?,
        ))
    }
}
