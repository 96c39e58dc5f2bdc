//! Mel energy and MFCC extractors

use super::{Feature, FeatureExtractor, FeatureValue, SegmentView};
use crate::error::Result;
use crate::spectrum::cepstrum::compute_dct;
use crate::spectrum::mel::MelFilterBank;

/// Log-compressed Mel filterbank energies
pub struct MelEnergiesExtractor {
    bank: MelFilterBank,
}

impl MelEnergiesExtractor {
    pub fn new(num_filters: usize, spec_len: usize, sample_rate: u32) -> Self {
        Self {
            bank: MelFilterBank::new(num_filters, spec_len, sample_rate),
        }
    }
}

impl FeatureExtractor for MelEnergiesExtractor {
    fn feature(&self) -> Feature {
        Feature::MelEnergies
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        let spectrum = segment.spectrum()?;
        Ok(FeatureValue::Vector(
            self.bank.log_energies(&spectrum.magnitudes)?,
        ))
    }
}

/// Cepstral coefficients of the log Mel energies
pub struct MfccExtractor {
    bank: MelFilterBank,
    num_coefficients: usize,
}

impl MfccExtractor {
    pub fn new(
        num_filters: usize,
        num_coefficients: usize,
        spec_len: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            bank: MelFilterBank::new(num_filters, spec_len, sample_rate),
            num_coefficients,
        }
    }
}

impl FeatureExtractor for MfccExtractor {
    fn feature(&self) -> Feature {
        Feature::Mfcc
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        let spectrum = segment.spectrum()?;
        let log_energies = self.bank.log_energies(&spectrum.magnitudes)?;
        Ok(FeatureValue::Vector(compute_dct(
            &log_energies,
            self.num_coefficients,
        )?))
    }
}
