//! Chromagram: spectral energy folded onto the 12 pitch classes

use super::{Feature, FeatureExtractor, FeatureValue, SegmentView};
use crate::error::Result;
use crate::spectrum::Spectrum;

/// Number of pitch classes (C, C#, ..., B)
pub const PITCH_CLASSES: usize = 12;

/// Bins below this frequency carry no usable pitch information
const MIN_PITCH_HZ: f32 = 27.5;

/// Energy per pitch class, normalized so the strongest class is 1.0
///
/// Index 0 is C. An all-zero spectrum yields all zeros.
pub fn chromagram(spectrum: &Spectrum) -> [f32; PITCH_CLASSES] {
    let mut chroma = [0.0f32; PITCH_CLASSES];

    for (freq, mag) in spectrum.bins() {
        if freq < MIN_PITCH_HZ || mag <= 0.0 {
            continue;
        }
        // MIDI note 69 is A4 = 440 Hz, MIDI 60 is C4
        let midi = 69.0 + 12.0 * (freq / 440.0).log2();
        let class = (midi.round() as i64).rem_euclid(PITCH_CLASSES as i64) as usize;
        chroma[class] += mag * mag;
    }

    let max = chroma.iter().cloned().fold(0.0f32, f32::max);
    if max > 0.0 {
        for value in chroma.iter_mut() {
            *value /= max;
        }
    }
    chroma
}

pub struct ChromagramExtractor;

impl FeatureExtractor for ChromagramExtractor {
    fn feature(&self) -> Feature {
        Feature::Chromagram
    }

    fn extract(&self, segment: &SegmentView<'_>) -> Result<FeatureValue> {
        Ok(FeatureValue::Vector(
            chromagram(segment.spectrum()?).to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_bin(k: usize, fft_size: usize, sample_rate: u32) -> Spectrum {
        let mut magnitudes = vec![0.0; fft_size / 2];
        magnitudes[k] = 1.0;
        Spectrum {
            magnitudes,
            fft_size,
            sample_rate,
        }
    }

    #[test]
    fn test_a440_maps_to_a() {
        // 44 * 10 Hz bins = 440 Hz
        let spectrum = single_bin(44, 1600, 16000);
        let chroma = chromagram(&spectrum);
        assert_eq!(chroma[9], 1.0);
        assert!(chroma
            .iter()
            .enumerate()
            .all(|(i, &v)| i == 9 || v == 0.0));
    }

    #[test]
    fn test_octaves_share_class() {
        let low = chromagram(&single_bin(22, 1600, 16000));
        let high = chromagram(&single_bin(88, 1600, 16000));
        assert_eq!(low, high);
    }

    #[test]
    fn test_silence() {
        let spectrum = Spectrum {
            magnitudes: vec![0.0; 512],
            fft_size: 1024,
            sample_rate: 16000,
        };
        assert_eq!(chromagram(&spectrum), [0.0; PITCH_CLASSES]);
    }
}
