//! Radix-2 FFT engine for real-valued segments
//!
//! Twiddle tables are computed once for the largest supported length and
//! subsampled for shorter transforms. All work happens in a preallocated
//! scratch buffer, so repeated windows never allocate.

use num_complex::Complex;
use std::f32::consts::PI;

use crate::error::{AnalysisError, Result};

/// Forward FFT engine for real-valued signals
pub struct FftEngine {
    /// Largest transform length this engine accepts
    max_size: usize,

    /// cos(2πi/max_size) for i in 0..max_size/2
    cos_table: Vec<f32>,

    /// sin(2πi/max_size) for i in 0..max_size/2
    sin_table: Vec<f32>,

    /// Reusable complex working buffer
    scratch: Vec<Complex<f32>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `max_size` - Largest transform length (power of two, >= 2)
    pub fn new(max_size: usize) -> Result<Self> {
        if !is_valid_length(max_size) {
            return Err(AnalysisError::InvalidSegmentLength { len: max_size });
        }

        let half = max_size / 2;
        let (cos_table, sin_table) = (0..half)
            .map(|i| {
                let angle = 2.0 * PI * i as f32 / max_size as f32;
                (angle.cos(), angle.sin())
            })
            .unzip();

        Ok(Self {
            max_size,
            cos_table,
            sin_table,
            scratch: vec![Complex::new(0.0, 0.0); max_size],
        })
    }

    /// Compute the unnormalized forward DFT in place
    ///
    /// On return `data[2k]` and `data[2k + 1]` hold the real and imaginary
    /// parts of bin `k` for `k` in `0..n/2`. Bins above Nyquist are the
    /// conjugate mirror for real input and are not stored.
    pub fn forward(&mut self, data: &mut [f32]) -> Result<()> {
        let n = data.len();
        if !is_valid_length(n) || n > self.max_size {
            return Err(AnalysisError::InvalidSegmentLength { len: n });
        }

        let bits = n.trailing_zeros();
        let scratch = &mut self.scratch[..n];

        // Bit-reversed load: leaves of the even/odd recursion in order
        for (i, &sample) in data.iter().enumerate() {
            let j = i.reverse_bits() >> (usize::BITS - bits);
            scratch[j] = Complex::new(sample, 0.0);
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = self.max_size / size;
            for start in (0..n).step_by(size) {
                for k in 0..half {
                    let t = k * stride;
                    let twiddle = Complex::new(self.cos_table[t], -self.sin_table[t]);
                    let odd = twiddle * scratch[start + k + half];
                    let even = scratch[start + k];
                    scratch[start + k] = even + odd;
                    scratch[start + k + half] = even - odd;
                }
            }
            size *= 2;
        }

        for (k, bin) in scratch[..n / 2].iter().enumerate() {
            data[2 * k] = bin.re;
            data[2 * k + 1] = bin.im;
        }

        Ok(())
    }

    /// Get the largest supported transform length
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Convert bin index to frequency in Hz for a transform of `fft_size`
    pub fn bin_to_hz(bin: usize, fft_size: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / fft_size as f32
    }
}

fn is_valid_length(n: usize) -> bool {
    n >= 2 && n.is_power_of_two()
}
