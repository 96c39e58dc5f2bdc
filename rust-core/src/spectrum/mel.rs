//! Mel-scale triangular filterbank and log compression
//!
//! Filters span 0 Hz to the Mel-warped Nyquist frequency. Edges sit on
//! `num_filters + 2` linearly spaced Mel points mapped back to Hz and then
//! to bin indices with `bin = hz * (spec_len - 1) / sample_rate`.

use ndarray::{Array2, ArrayView1};

use crate::error::{AnalysisError, Result};

/// Corner frequency of the Mel formula (Hz)
pub const MEL_BREAK_HZ: f64 = 700.0;

/// Scale factor of the Mel formula
pub const MEL_SCALE: f64 = 2595.0;

/// Floor added before taking the log of a filter energy
pub const LOG_FLOOR: f32 = f32::MIN_POSITIVE;

/// Convert Hz to Mel: `2595 * log10(1 + f / 700)`
pub fn hz_to_mel(hz: f64) -> f64 {
    MEL_SCALE * (1.0 + hz / MEL_BREAK_HZ).log10()
}

/// Convert Mel to Hz: `700 * (10^(m / 2595) - 1)`
pub fn mel_to_hz(mel: f64) -> f64 {
    MEL_BREAK_HZ * (10f64.powf(mel / MEL_SCALE) - 1.0)
}

/// Triangular Mel filterbank, one row of weights per filter
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    weights: Array2<f32>,
}

impl MelFilterBank {
    /// Build the filterbank
    ///
    /// # Arguments
    /// * `num_filters` - Number of triangular filters
    /// * `spec_len` - Length of the magnitude spectrum the bank is applied to
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(num_filters: usize, spec_len: usize, sample_rate: u32) -> Self {
        let sample_rate = sample_rate as f64;
        let mel_max = hz_to_mel(sample_rate / 2.0);
        let steps = (num_filters + 1) as f64;

        let edges: Vec<f64> = (0..num_filters + 2)
            .map(|i| {
                let hz = mel_to_hz(i as f64 * mel_max / steps);
                hz * spec_len.saturating_sub(1) as f64 / sample_rate
            })
            .collect();

        let mut weights = Array2::<f32>::zeros((num_filters, spec_len));
        for (f, mut row) in weights.outer_iter_mut().enumerate() {
            let (left, center, right) = (edges[f], edges[f + 1], edges[f + 2]);

            if center > left {
                for j in (left as usize)..(center as usize).min(spec_len) {
                    row[j] = ((j as f64 - left) / (center - left)).clamp(0.0, 1.0) as f32;
                }
            }
            if right > center {
                for j in (center as usize)..(right as usize).min(spec_len) {
                    row[j] = ((right - j as f64) / (right - center)).clamp(0.0, 1.0) as f32;
                }
            }
        }

        Self { weights }
    }

    /// Energy under each filter (dot product of weights and spectrum)
    pub fn energies(&self, spectrum: &[f32]) -> Result<Vec<f32>> {
        let expected = self.spectrum_len();
        if spectrum.len() != expected {
            return Err(AnalysisError::SpectrumLengthMismatch {
                expected,
                actual: spectrum.len(),
            });
        }

        Ok(self.weights.dot(&ArrayView1::from(spectrum)).to_vec())
    }

    /// Log-compressed filter energies
    pub fn log_energies(&self, spectrum: &[f32]) -> Result<Vec<f32>> {
        Ok(log_compress(&self.energies(spectrum)?))
    }

    /// Weights of filter `index`
    pub fn filter(&self, index: usize) -> ArrayView1<'_, f32> {
        self.weights.row(index)
    }

    /// Number of filters
    pub fn num_filters(&self) -> usize {
        self.weights.nrows()
    }

    /// Spectrum length the bank expects
    pub fn spectrum_len(&self) -> usize {
        self.weights.ncols()
    }
}

/// `ln(energy + LOG_FLOOR)` per filter
pub fn log_compress(energies: &[f32]) -> Vec<f32> {
    energies.iter().map(|&e| (e + LOG_FLOOR).ln()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_formula() {
        assert!((hz_to_mel(700.0) - 2595.0 * 2f64.log10()).abs() < 1e-9);
        assert_eq!(hz_to_mel(0.0), 0.0);
        for hz in [0.0, 100.0, 1000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
    }

    #[test]
    fn test_filter_count_and_weights() {
        for &(num_filters, spec_len, sample_rate) in &[
            (26, 512, 16000),
            (26, 1024, 44100),
            (40, 256, 8000),
            (10, 64, 48000),
            (1, 16, 16000),
        ] {
            let bank = MelFilterBank::new(num_filters, spec_len, sample_rate);
            assert_eq!(bank.num_filters(), num_filters);
            assert_eq!(bank.spectrum_len(), spec_len);
            for f in 0..num_filters {
                assert!(bank
                    .filter(f)
                    .iter()
                    .all(|&w| (0.0..=1.0).contains(&w)));
            }
        }
    }

    #[test]
    fn test_every_filter_is_triangular_and_nonzero() {
        let bank = MelFilterBank::new(26, 512, 16000);
        for f in 0..26 {
            let row = bank.filter(f).to_vec();
            let nonzero: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, &w)| w > 0.0)
                .map(|(j, _)| j)
                .collect();
            assert!(!nonzero.is_empty(), "filter {f} is empty");

            // Peak of 1 at the center bin
            let max = row.iter().cloned().fold(0.0f32, f32::max);
            assert!((max - 1.0).abs() < 1e-6, "filter {f} peaks at {max}");

            // Rises then falls
            let peak = row.iter().position(|&w| w == max).unwrap();
            let first = nonzero[0];
            let last = *nonzero.last().unwrap();
            assert!(row[first..=peak].windows(2).all(|w| w[0] <= w[1]));
            assert!(row[peak..=last].windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn test_filters_cover_lower_half_of_spectrum() {
        // Nyquist maps to bin (spec_len - 1) / 2 under the bin formula
        let bank = MelFilterBank::new(26, 512, 16000);
        let last = bank.filter(25);
        assert!(last.iter().skip(256).all(|&w| w == 0.0));
    }

    #[test]
    fn test_energies_flat_spectrum() {
        let bank = MelFilterBank::new(26, 512, 16000);
        let spectrum = vec![2.0; 512];
        let energies = bank.energies(&spectrum).unwrap();
        assert_eq!(energies.len(), 26);
        for (f, &e) in energies.iter().enumerate() {
            let sum: f32 = bank.filter(f).sum();
            assert!((e - 2.0 * sum).abs() < 1e-3);
        }
    }

    #[test]
    fn test_energies_length_mismatch() {
        let bank = MelFilterBank::new(26, 512, 16000);
        assert_eq!(
            bank.energies(&[0.0; 100]),
            Err(AnalysisError::SpectrumLengthMismatch {
                expected: 512,
                actual: 100
            })
        );
    }

    #[test]
    fn test_log_compress_never_infinite() {
        let logs = log_compress(&[0.0, 1.0, std::f32::consts::E]);
        assert!(logs[0].is_finite());
        assert!(logs[0] < -80.0);
        assert!(logs[1].abs() < 1e-6);
        assert!((logs[2] - 1.0).abs() < 1e-6);
    }
}
