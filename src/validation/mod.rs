// src/validation/mod.rs

//! Provides functions to validate a `Wavefunction` after evolution.

use crate::core::{GridPoint, WaveError, Wavefunction};

/// Default tolerance for `|Σ|ψ|² - 1|` (can be overridden by caller).
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Checks if the grid is normalized (sum of squared magnitudes is close to 1).
///
/// # Arguments
/// * `wavefunction` - The grid to check.
/// * `tolerance` - Optional tolerance. Uses `DEFAULT_NORM_TOLERANCE` if `None`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(WaveError::Instability)` if normalization fails.
pub fn check_normalization(wavefunction: &Wavefunction, tolerance: Option<f64>) -> Result<(), WaveError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = wavefunction.total_probability();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(WaveError::Instability {
            message: format!(
                "Wavefunction normalization failed. Sum(|psi|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every amplitude is finite.
///
/// Reports the first non-finite cell in row-major order.
pub fn check_finite(wavefunction: &Wavefunction) -> Result<(), WaveError> {
    match wavefunction.values().indexed_iter().find(|(_, c)| !(c.re.is_finite() && c.im.is_finite())) {
        Some(((i, j), value)) => Err(WaveError::Instability {
            message: format!("non-finite amplitude {} at {}", value, GridPoint::new(i, j)),
        }),
        None => Ok(()),
    }
}

/// Performs the standard checks on a grid that is expected to carry a
/// normalized particle: finiteness, then normalization.
pub fn validate_state(wavefunction: &Wavefunction, norm_tolerance: Option<f64>) -> Result<(), WaveError> {
    check_finite(wavefunction)?;
    check_normalization(wavefunction, norm_tolerance)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_normalized_grid_passes() -> Result<(), WaveError> {
        let mut wf = Wavefunction::zeros(3, 3);
        wf.set(1, 1, Complex64::new(0.6, 0.0))?;
        wf.set(2, 1, Complex64::new(0.0, 0.8))?;
        check_normalization(&wf, None)?;
        validate_state(&wf, None)?;
        Ok(())
    }

    #[test]
    fn test_unnormalized_grid_fails() -> Result<(), WaveError> {
        let mut wf = Wavefunction::zeros(3, 3);
        wf.set(1, 1, Complex64::new(1.0, 1.0))?;
        assert!(matches!(check_normalization(&wf, None), Err(WaveError::Instability { .. })));
        assert!(check_normalization(&wf, Some(1.5)).is_ok());
        Ok(())
    }

    #[test]
    fn test_non_finite_cell_is_reported() -> Result<(), WaveError> {
        let mut wf = Wavefunction::zeros(4, 4);
        wf.set(2, 3, Complex64::new(f64::NAN, 0.0))?;
        match check_finite(&wf) {
            Err(WaveError::Instability { message }) => assert!(message.contains("(2, 3)")),
            other => panic!("expected instability, got {:?}", other),
        }
        Ok(())
    }
}
