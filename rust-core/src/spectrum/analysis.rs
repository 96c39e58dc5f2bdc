//! Per-segment spectrum analyzer
//!
//! Combines windowing, explicit zero padding and the FFT engine. Segments
//! whose length is not a power of two are padded to the next one here, so
//! the engine itself never pads implicitly.

use super::fft::FftEngine;
use super::power::power_spectrum;
use super::windowing::{generate_window, window_into, WindowType};
use crate::error::{AnalysisError, Result};

/// Magnitude spectrum of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Magnitude per bin, `fft_size / 2` entries
    pub magnitudes: Vec<f32>,

    /// Transform length used to produce the spectrum
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Spectrum {
    /// Frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        FftEngine::bin_to_hz(k, self.fft_size, self.sample_rate)
    }

    /// Iterate `(frequency_hz, magnitude)` pairs
    pub fn bins(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.magnitudes
            .iter()
            .enumerate()
            .map(|(k, &m)| (self.bin_frequency(k), m))
    }
}

/// Reusable spectrum analyzer for fixed-length segments
pub struct SpectrumAnalyzer {
    segment_len: usize,
    fft_size: usize,
    sample_rate: u32,
    window_type: WindowType,
    window: Vec<f32>,
    engine: FftEngine,
    frame: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer
    ///
    /// # Arguments
    /// * `segment_len` - Samples per segment
    /// * `sample_rate` - Sample rate in Hz
    /// * `window_type` - Window applied before the FFT
    pub fn new(segment_len: usize, sample_rate: u32, window_type: WindowType) -> Result<Self> {
        let fft_size = Self::fft_size_for(segment_len);
        let engine = FftEngine::new(fft_size)?;

        Ok(Self {
            segment_len,
            fft_size,
            sample_rate,
            window_type,
            window: generate_window(window_type, segment_len),
            engine,
            frame: vec![0.0; fft_size],
        })
    }

    /// Transform length used for segments of `segment_len` samples
    pub fn fft_size_for(segment_len: usize) -> usize {
        segment_len.max(2).next_power_of_two()
    }

    /// Analyze one segment and return its magnitude spectrum
    pub fn analyze(&mut self, segment: &[f32]) -> Result<Spectrum> {
        if segment.len() != self.segment_len {
            return Err(AnalysisError::InvalidSegmentLength { len: segment.len() });
        }

        window_into(segment, &self.window, &mut self.frame);
        self.engine.forward(&mut self.frame)?;

        Ok(Spectrum {
            magnitudes: power_spectrum(&self.frame)?,
            fft_size: self.fft_size,
            sample_rate: self.sample_rate,
        })
    }

    /// Get transform length
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of magnitude bins per spectrum
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Get window type
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_pads_to_power_of_two() {
        assert_eq!(SpectrumAnalyzer::fft_size_for(800), 1024);
        assert_eq!(SpectrumAnalyzer::fft_size_for(1024), 1024);
        assert_eq!(SpectrumAnalyzer::fft_size_for(1), 2);

        let analyzer = SpectrumAnalyzer::new(800, 16000, WindowType::Rectangular).unwrap();
        assert_eq!(analyzer.fft_size(), 1024);
        assert_eq!(analyzer.num_bins(), 512);
    }

    #[test]
    fn test_analyzer_peak_frequency() {
        let sample_rate = 16000;
        let mut analyzer = SpectrumAnalyzer::new(800, sample_rate, WindowType::Hann).unwrap();

        let freq_hz = 1000.0;
        let segment: Vec<f32> = (0..800)
            .map(|n| (2.0 * PI * freq_hz * n as f32 / sample_rate as f32).sin())
            .collect();

        let spectrum = analyzer.analyze(&segment).unwrap();
        assert_eq!(spectrum.magnitudes.len(), 512);

        let (peak_freq, _) = spectrum
            .bins()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        // Bin width is 15.6 Hz
        assert!((peak_freq - freq_hz).abs() < 20.0);
    }

    #[test]
    fn test_wrong_segment_length() {
        let mut analyzer = SpectrumAnalyzer::new(800, 16000, WindowType::Rectangular).unwrap();
        assert_eq!(
            analyzer.analyze(&[0.0; 799]),
            Err(AnalysisError::InvalidSegmentLength { len: 799 })
        );
    }
}
