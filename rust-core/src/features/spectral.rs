//! Scalar spectral shape features
//!
//! All features read the magnitude spectrum. Frequencies are in Hz.

use super::{Feature, FeatureExtractor, FeatureValue, SegmentView};
use crate::error::Result;
use crate::spectrum::Spectrum;

/// Fraction of spectral energy below the rolloff frequency
pub const ROLLOFF_THRESHOLD: f32 = 0.85;

/// Floor applied to magnitudes before the geometric mean's log
const FLATNESS_FLOOR: f32 = 1e-10;

const EPSILON: f32 = 1e-10;

/// Magnitude-weighted mean frequency
pub fn spectral_centroid(spectrum: &Spectrum) -> f32 {
    let magnitude_sum: f32 = spectrum.magnitudes.iter().sum();
    if magnitude_sum <= EPSILON {
        return 0.0;
    }

    let weighted_sum: f32 = spectrum.bins().map(|(freq, mag)| freq * mag).sum();
    weighted_sum / magnitude_sum
}

/// Ratio of geometric to arithmetic mean of the magnitudes
///
/// 1.0 for a perfectly flat spectrum, near 0.0 for a pure tone.
pub fn spectral_flatness(magnitudes: &[f32]) -> f32 {
    if magnitudes.is_empty() {
        return 0.0;
    }

    let count = magnitudes.len() as f32;
    let mean = magnitudes.iter().sum::<f32>() / count;
    if mean <= 0.0 {
        return 0.0;
    }

    let log_sum: f32 = magnitudes.iter().map(|&m| m.max(FLATNESS_FLOOR).ln()).sum();
    let geometric_mean = (log_sum / count).exp();
    geometric_mean / mean
}

/// Frequency below which `threshold` of the spectral energy lies
pub fn spectral_rolloff(spectrum: &Spectrum, threshold: f32) -> f32 {
    let total_energy: f32 = spectrum.magnitudes.iter().map(|&m| m * m).sum();
    if total_energy <= EPSILON {
        return 0.0;
    }

    let target = threshold * total_energy;
    let mut cumulative = 0.0;
    for (freq, mag) in spectrum.bins() {
        cumulative += mag * mag;
        if cumulative >= target {
            return freq;
        }
    }

    spectrum.bin_frequency(spectrum.magnitudes.len().saturating_sub(1))
}

/// Magnitude-weighted standard deviation around the centroid
pub fn spectral_bandwidth(spectrum: &Spectrum) -> f32 {
    let magnitude_sum: f32 = spectrum.magnitudes.iter().sum();
    if magnitude_sum <= EPSILON {
        return 0.0;
    }

    let centroid = spectral_centroid(spectrum);
    let variance: f32 = spectrum
        .bins()
        .map(|(freq, mag)| mag * (freq - centroid).powi(2))
        .sum::<f32>()
        / magnitude_sum;
    variance.sqrt()
}

pub struct CentroidExtractor;

impl FeatureExtractor for CentroidExtractor {
    fn feature(&self) -> Feature {
        Feature::SpectralCentroid
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Scalar(spectral_centroid(segment.spectrum()?)))
    }
}

pub struct FlatnessExtractor;

impl FeatureExtractor for FlatnessExtractor {
    fn feature(&self) -> Feature {
        Feature::SpectralFlatness
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Scalar(spectral_flatness(
            &segment.spectrum()?.magnitudes,
        )))
    }
}

pub struct RolloffExtractor {
    threshold: f32,
}

impl Default for RolloffExtractor {
    fn default() -> Self {
        Self {
            threshold: ROLLOFF_THRESHOLD,
        }
    }
}

impl FeatureExtractor for RolloffExtractor {
    fn feature(&self) -> Feature {
        Feature::SpectralRolloff
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Scalar(spectral_rolloff(
            segment.spectrum()?,
            self.threshold,
        )))
    }
}

pub struct BandwidthExtractor;

impl FeatureExtractor for BandwidthExtractor {
    fn feature(&self) -> Feature {
        Feature::SpectralBandwidth
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Scalar(spectral_bandwidth(segment.spectrum()?)))
    }
}
