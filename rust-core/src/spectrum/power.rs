//! Magnitude spectrum from interleaved FFT output

use crate::error::{AnalysisError, Result};

/// Compute per-bin magnitude `sqrt(re² + im²)` from packed FFT output
///
/// # Arguments
/// * `packed` - Interleaved real/imaginary pairs as produced by `FftEngine::forward`
///
/// # Returns
/// `packed.len() / 2` magnitudes, one per bin
pub fn power_spectrum(packed: &[f32]) -> Result<Vec<f32>> {
    if packed.len() % 2 != 0 {
        return Err(AnalysisError::OddTransformLength { len: packed.len() });
    }

    Ok(packed
        .chunks_exact(2)
        .map(|pair| (pair[0] * pair[0] + pair[1] * pair[1]).sqrt())
        .collect())
}
