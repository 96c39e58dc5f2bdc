//! Analysis windows applied to a segment before the FFT
//!
//! The default is rectangular, which leaves samples untouched.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    #[default]
    Rectangular,
}

/// Generate window coefficients w[n] for n = 0..length
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f32> {
    if length < 2 {
        return vec![1.0; length];
    }

    let denom = (length - 1) as f32;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f32 / denom;
            match window_type {
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
                WindowType::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Multiply `segment` by `window` into the front of `frame` and zero the rest
///
/// `frame` must be at least as long as `segment`; the tail is explicit
/// zero padding up to the transform length.
pub fn window_into(segment: &[f32], window: &[f32], frame: &mut [f32]) {
    let (head, tail) = frame.split_at_mut(segment.len());
    for ((out, &s), &w) in head.iter_mut().zip(segment).zip(window) {
        *out = s * w;
    }
    tail.fill(0.0);
}
