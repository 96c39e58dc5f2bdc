//! Named feature extractors
//!
//! Every extractor sits behind the same `(segment, sample_rate) -> value`
//! contract. Extractors without an implementation fail with
//! `UnsupportedFeature` instead of returning a placeholder value.

pub mod cepstral;
pub mod chroma;
pub mod harmonic;
pub mod spectral;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{NUM_MEL_FILTERS, NUM_MFCC_COEFFICIENTS};
use crate::error::{AnalysisError, Result};
use crate::spectrum::Spectrum;

pub use cepstral::{MelEnergiesExtractor, MfccExtractor};
pub use chroma::ChromagramExtractor;
pub use harmonic::HnrExtractor;
pub use spectral::{BandwidthExtractor, CentroidExtractor, FlatnessExtractor, RolloffExtractor};

/// Named features a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    MelEnergies,
    Mfcc,
    SpectralCentroid,
    SpectralFlatness,
    SpectralRolloff,
    SpectralBandwidth,
    Chromagram,
    Tempo,
    Hnr,
}

impl Feature {
    /// Every known feature
    pub const ALL: [Feature; 9] = [
        Feature::MelEnergies,
        Feature::Mfcc,
        Feature::SpectralCentroid,
        Feature::SpectralFlatness,
        Feature::SpectralRolloff,
        Feature::SpectralBandwidth,
        Feature::Chromagram,
        Feature::Tempo,
        Feature::Hnr,
    ];

    /// Wire name of the feature
    pub fn name(&self) -> &'static str {
        match self {
            Feature::MelEnergies => "melEnergies",
            Feature::Mfcc => "mfcc",
            Feature::SpectralCentroid => "spectralCentroid",
            Feature::SpectralFlatness => "spectralFlatness",
            Feature::SpectralRolloff => "spectralRolloff",
            Feature::SpectralBandwidth => "spectralBandwidth",
            Feature::Chromagram => "chromagram",
            Feature::Tempo => "tempo",
            Feature::Hnr => "hnr",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value produced by an extractor
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Scalar(f32),
    Vector(Vec<f32>),
}

/// One segment as seen by an extractor
pub struct SegmentView<'a> {
    samples: &'a [f32],
    sample_rate: u32,
    spectrum: Option<&'a Spectrum>,
}

impl<'a> SegmentView<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32, spectrum: Option<&'a Spectrum>) -> Self {
        Self {
            samples,
            sample_rate,
            spectrum,
        }
    }

    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Magnitude spectrum of the segment, if it could be computed
    pub fn spectrum(&self) -> Result<&'a Spectrum> {
        self.spectrum.ok_or(AnalysisError::SpectrumUnavailable)
    }
}

/// Common contract for swappable feature extractors
pub trait FeatureExtractor: Send {
    /// Feature this extractor produces
    fn feature(&self) -> Feature;

    /// Whether the extractor reads the magnitude spectrum
    fn needs_spectrum(&self) -> bool {
        true
    }

    /// Whether `extract` can ever succeed
    fn is_implemented(&self) -> bool {
        true
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue>;
}

/// Extractor for a feature that has no implementation
pub struct Unimplemented(pub Feature);

impl FeatureExtractor for Unimplemented {
    fn feature(&self) -> Feature {
        self.0
    }

    fn needs_spectrum(&self) -> bool {
        false
    }

    fn is_implemented(&self) -> bool {
        false
    }

    fn extract(&self, _segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Err(AnalysisError::UnsupportedFeature(self.0))
    }
}

/// Build the extractor for `feature`
///
/// # Arguments
/// * `fft_size` - Transform length of the spectra the extractor will see
/// * `sample_rate` - Sample rate in Hz
pub fn build_extractor(
    feature: Feature,
    fft_size: usize,
    sample_rate: u32,
) -> Box<dyn FeatureExtractor> {
    let spec_len = fft_size / 2;
    match feature {
        Feature::MelEnergies => Box::new(MelEnergiesExtractor::new(
            NUM_MEL_FILTERS,
            spec_len,
            sample_rate,
        )),
        Feature::Mfcc => Box::new(MfccExtractor::new(
            NUM_MEL_FILTERS,
            NUM_MFCC_COEFFICIENTS,
            spec_len,
            sample_rate,
        )),
        Feature::SpectralCentroid => Box::new(CentroidExtractor),
        Feature::SpectralFlatness => Box::new(FlatnessExtractor),
        Feature::SpectralRolloff => Box::new(RolloffExtractor::default()),
        Feature::SpectralBandwidth => Box::new(BandwidthExtractor),
        Feature::Chromagram => Box::new(ChromagramExtractor),
        Feature::Hnr => Box::new(HnrExtractor::default()),
        Feature::Tempo => Box::new(Unimplemented(Feature::Tempo)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_feature() {
        for feature in Feature::ALL {
            let extractor = build_extractor(feature, 1024, 16000);
            assert_eq!(extractor.feature(), feature);
        }
    }

    #[test]
    fn test_tempo_is_explicitly_unimplemented() {
        let extractor = build_extractor(Feature::Tempo, 1024, 16000);
        assert!(!extractor.is_implemented());

        let samples = vec![0.5; 800];
        let view = SegmentView::new(&samples, 16000, None);
        assert_eq!(
            extractor.extract(&view),
            Err(AnalysisError::UnsupportedFeature(Feature::Tempo))
        );
    }

    #[test]
    fn test_spectral_extractor_without_spectrum() {
        let extractor = build_extractor(Feature::SpectralCentroid, 1024, 16000);
        let samples = vec![0.5; 800];
        let view = SegmentView::new(&samples, 16000, None);
        assert_eq!(
            extractor.extract(&view),
            Err(AnalysisError::SpectrumUnavailable)
        );
    }

    #[test]
    fn test_wire_names_match_serde() {
        for feature in Feature::ALL {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.name()));
        }
    }
}
