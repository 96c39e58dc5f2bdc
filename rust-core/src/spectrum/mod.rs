//! Spectral analysis: FFT, Mel filterbank and cepstral transform

pub mod analysis;
pub mod cepstrum;
pub mod fft;
pub mod mel;
pub mod power;
pub mod windowing;

pub use analysis::{Spectrum, SpectrumAnalyzer};
pub use cepstrum::compute_dct;
pub use fft::FftEngine;
pub use mel::MelFilterBank;
pub use power::power_spectrum;
pub use windowing::WindowType;
