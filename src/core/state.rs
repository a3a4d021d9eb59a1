// src/core/state.rs

use super::error::WaveError;
use super::grid::{GridPoint, Region};
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use num_traits::Zero;
use std::fmt;
use std::ops::Index;

/// The discretized wavefunction ψ over a `(xmesh + 1) × (ymesh + 1)` lattice,
/// indexed `[i][j]` with `i ∈ [0, xmesh]` and `j ∈ [0, ymesh]`.
///
/// Inside a [`DiscreteModel`](crate::simulation::DiscreteModel) the grid is
/// only ever handed out by shared reference, so renderers can read it but
/// only the model and its propagator write to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavefunction {
    values: Array2<Complex64>,
}

impl Wavefunction {
    /// Allocates an all-zero grid for the given mesh counts.
    pub fn zeros(xmesh: usize, ymesh: usize) -> Self {
        Self { values: Array2::zeros((xmesh + 1, ymesh + 1)) }
    }

    /// Wraps an existing array. Its shape defines the mesh.
    pub fn from_array(values: Array2<Complex64>) -> Result<Self, WaveError> {
        let (width, height) = values.dim();
        if width == 0 || height == 0 {
            return Err(WaveError::invalid("wavefunction grid must not be empty"));
        }
        Ok(Self { values })
    }

    /// Number of columns, `xmesh + 1`.
    pub fn width(&self) -> usize {
        self.values.nrows()
    }

    /// Number of rows, `ymesh + 1`.
    pub fn height(&self) -> usize {
        self.values.ncols()
    }

    pub fn xmesh(&self) -> usize {
        self.width() - 1
    }

    pub fn ymesh(&self) -> usize {
        self.height() - 1
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.width() && j < self.height()
    }

    /// Read-only view of the amplitudes.
    pub fn values(&self) -> ArrayView2<'_, Complex64> {
        self.values.view()
    }

    /// Mutable access for initial-wavefunction strategies and the propagator.
    pub fn values_mut(&mut self) -> &mut Array2<Complex64> {
        &mut self.values
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Complex64> {
        self.values.get((i, j)).copied()
    }

    pub fn set(&mut self, i: usize, j: usize, value: Complex64) -> Result<(), WaveError> {
        let (width, height) = (self.width(), self.height());
        match self.values.get_mut((i, j)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(WaveError::OutOfBounds { point: GridPoint::new(i, j), width, height }),
        }
    }

    pub fn fill(&mut self, value: Complex64) {
        self.values.fill(value);
    }

    /// Σ|ψ_ij|² over the whole grid.
    pub fn total_probability(&self) -> f64 {
        self.values.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Σ|ψ_ij|² over the grid excluding the outermost boundary ring.
    pub fn interior_probability(&self) -> f64 {
        let (width, height) = (self.width(), self.height());
        if width < 3 || height < 3 {
            return 0.0;
        }
        self.values
            .slice(ndarray::s![1..width - 1, 1..height - 1])
            .iter()
            .map(|c| c.norm_sqr())
            .sum()
    }

    /// Σ|ψ_ij|² over the cells of `region` that lie on the grid.
    pub fn probability_in(&self, region: &Region) -> f64 {
        region
            .cells_within(self.width(), self.height())
            .map(|(i, j)| self.values[(i, j)].norm_sqr())
            .sum()
    }

    /// Rescales the grid so that Σ|ψ|² = 1. Returns the previous total
    /// probability.
    pub fn normalize(&mut self) -> Result<f64, WaveError> {
        let total = self.total_probability();
        self.scale_to_unit(total)?;
        Ok(total)
    }

    /// Rescales the grid so that the interior (boundary ring excluded) sums
    /// to one. Returns the previous interior probability.
    pub fn normalize_interior(&mut self) -> Result<f64, WaveError> {
        let total = self.interior_probability();
        self.scale_to_unit(total)?;
        Ok(total)
    }

    fn scale_to_unit(&mut self, total: f64) -> Result<(), WaveError> {
        if !(total.is_finite() && total > 0.0) {
            return Err(WaveError::Instability {
                message: format!("cannot normalize a wavefunction with total probability {}", total),
            });
        }
        let factor = 1.0 / total.sqrt();
        self.values.mapv_inplace(|c| c * factor);
        Ok(())
    }

    /// Probability-weighted mean position `(⟨i⟩, ⟨j⟩)`, or `None` for an
    /// all-zero grid.
    pub fn expected_position(&self) -> Option<(f64, f64)> {
        let total = self.total_probability();
        if total <= 0.0 {
            return None;
        }
        let (mut sum_i, mut sum_j) = (0.0, 0.0);
        for ((i, j), c) in self.values.indexed_iter() {
            let p = c.norm_sqr();
            sum_i += p * i as f64;
            sum_j += p * j as f64;
        }
        Some((sum_i / total, sum_j / total))
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|c| c.re.is_finite() && c.im.is_finite())
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|c| c.is_zero())
    }
}

impl Index<(usize, usize)> for Wavefunction {
    type Output = Complex64;

    fn index(&self, index: (usize, usize)) -> &Complex64 {
        &self.values[index]
    }
}

impl fmt::Display for Wavefunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wavefunction[{}x{}, P={:.6}]",
            self.width(),
            self.height(),
            self.total_probability()
        )
    }
}
