//! Cepstral transform (DCT-II of log filterbank energies)

use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// Compute `num_coefficients` cepstral coefficients
///
/// `coeff[i] = (1/√(2m)) · Σ_j logEnergy[j] · cos(π·i·(j+0.5)/m)`, accumulated
/// in double precision.
pub fn compute_dct(log_energies: &[f32], num_coefficients: usize) -> Result<Vec<f32>> {
    let m = log_energies.len();
    if m == 0 {
        return Err(AnalysisError::EmptyInput);
    }
    if num_coefficients == 0 || num_coefficients > m {
        return Err(AnalysisError::InvalidCoefficientCount {
            requested: num_coefficients,
            available: m,
        });
    }

    let m_f = m as f64;
    let scale = 1.0 / (2.0 * m_f).sqrt();

    Ok((0..num_coefficients)
        .map(|i| {
            let sum: f64 = log_energies
                .iter()
                .enumerate()
                .map(|(j, &e)| e as f64 * (PI * i as f64 * (j as f64 + 0.5) / m_f).cos())
                .sum();
            (sum * scale) as f32
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_energy() {
        for x in [0.0f32, 1.0, -3.5, 42.0] {
            let dct = compute_dct(&[x], 1).unwrap();
            assert_eq!(dct.len(), 1);
            assert!((dct[0] - x / 2f32.sqrt()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_constant_input_only_c0() {
        let energies = vec![2.0f32; 26];
        let dct = compute_dct(&energies, 13).unwrap();
        assert_eq!(dct.len(), 13);
        // c0 = 26 * 2 / sqrt(52)
        assert!((dct[0] - 52.0 / 52f32.sqrt()).abs() < 1e-4);
        assert!(dct[1..].iter().all(|c| c.abs() < 1e-4));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compute_dct(&[], 1), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_invalid_coefficient_count() {
        assert_eq!(
            compute_dct(&[1.0, 2.0], 3),
            Err(AnalysisError::InvalidCoefficientCount {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(
            compute_dct(&[1.0, 2.0], 0),
            Err(AnalysisError::InvalidCoefficientCount {
                requested: 0,
                available: 2
            })
        );
    }
}
