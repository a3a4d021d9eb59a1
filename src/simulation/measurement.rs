// src/simulation/measurement.rs

//! Inverse-CDF sampling of the position observable.

use crate::core::{GridPoint, WaveError, Wavefunction};
use num_complex::Complex64;
use num_traits::Zero;
use rand::Rng;

/// Samples a collapse point from `|ψ|²` over the interior of the grid.
///
/// Works on a copy: the copy is normalized over the interior (the sample
/// space) so that accumulated drift and any mass on the boundary ring cannot
/// leave the threshold unreachable. The caller's grid is not touched.
pub(crate) fn sample_collapse_point<R: Rng + ?Sized>(
    wavefunction: &Wavefunction,
    rng: &mut R,
) -> Result<GridPoint, WaveError> {
    let mut normalized = wavefunction.clone();
    normalized.normalize_interior().map_err(|err| WaveError::NoCollapsePoint {
        message: format!("interior cannot be normalized: {}", err),
    })?;
    let threshold: f64 = rng.random::<f64>();
    collapse_point_for(&normalized, threshold)
}

/// Scans interior points row-major (`i` outer, `j` inner), accumulating
/// `ψ*·ψ`, and returns the first point whose cumulative interval
/// `[|S_before|, |S_after|]` contains `threshold`.
pub(crate) fn collapse_point_for(wavefunction: &Wavefunction, threshold: f64) -> Result<GridPoint, WaveError> {
    let (width, height) = (wavefunction.width(), wavefunction.height());
    let values = wavefunction.values();
    let mut sum = Complex64::zero();
    for i in 1..width.saturating_sub(1) {
        for j in 1..height.saturating_sub(1) {
            let amplitude = values[(i, j)];
            let before = sum.norm();
            sum += amplitude.conj() * amplitude;
            let after = sum.norm();
            if before <= threshold && threshold <= after {
                return Ok(GridPoint::new(i, j));
            }
        }
    }
    Err(WaveError::NoCollapsePoint {
        message: format!(
            "cumulative probability {} never reached threshold {} on the {}x{} grid",
            sum.norm(),
            threshold,
            width,
            height
        ),
    })
}
