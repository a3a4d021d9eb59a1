// src/initial/mod.rs

//! Initial-wavefunction strategies. Each one overwrites every cell of the grid
//! it is given.

use crate::core::{GridPoint, WaveError, Wavefunction};
use num_complex::Complex64;
use num_traits::Zero;
use std::fmt;

/// Populates an entire grid with an initial amplitude distribution.
pub trait InitialWavefunction: fmt::Debug {
    fn initialize(&self, wavefunction: &mut Wavefunction);
}

/// The all-zero field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmptyWave;

impl InitialWavefunction for EmptyWave {
    fn initialize(&self, wavefunction: &mut Wavefunction) {
        wavefunction.fill(Complex64::zero());
    }
}

/// A normalized Gaussian packet
/// `exp(−|r − r₀|² / 4σ²) · exp(i p·r)`, so that `|ψ|²` has standard
/// deviation `σ` (= `width`, in cells) along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianWave {
    center: (f64, f64),
    momentum: (f64, f64),
    width: f64,
}

impl GaussianWave {
    pub fn new(center: (f64, f64), momentum: (f64, f64), width: f64) -> Result<Self, WaveError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(WaveError::invalid(format!("gaussian width must be positive and finite, got {}", width)));
        }
        if !(center.0.is_finite() && center.1.is_finite() && momentum.0.is_finite() && momentum.1.is_finite()) {
            return Err(WaveError::invalid("gaussian center and momentum must be finite"));
        }
        Ok(Self { center, momentum, width })
    }

    /// A packet at rest, centered on a lattice point. This is the shape a
    /// measurement collapses to.
    pub fn stationary(center: GridPoint, width: f64) -> Result<Self, WaveError> {
        Self::new((center.i as f64, center.j as f64), (0.0, 0.0), width)
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn momentum(&self) -> (f64, f64) {
        self.momentum
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

impl InitialWavefunction for GaussianWave {
    fn initialize(&self, wavefunction: &mut Wavefunction) {
        let (cx, cy) = self.center;
        let (px, py) = self.momentum;
        let denominator = 4.0 * self.width * self.width;
        wavefunction.values_mut().indexed_iter_mut().for_each(|((i, j), cell)| {
            let (x, y) = (i as f64, j as f64);
            let r2 = (x - cx).powi(2) + (y - cy).powi(2);
            *cell = Complex64::from_polar((-r2 / denominator).exp(), px * x + py * y);
        });
        normalize_or_warn(wavefunction, "gaussian");
    }
}

/// A normalized plane wave `exp(i(kx·i + ky·j))` filling the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneWave {
    pub kx: f64,
    pub ky: f64,
}

impl PlaneWave {
    pub fn new(kx: f64, ky: f64) -> Self {
        Self { kx, ky }
    }
}

impl InitialWavefunction for PlaneWave {
    fn initialize(&self, wavefunction: &mut Wavefunction) {
        wavefunction.values_mut().indexed_iter_mut().for_each(|((i, j), cell)| {
            *cell = Complex64::from_polar(1.0, self.kx * i as f64 + self.ky * j as f64);
        });
        normalize_or_warn(wavefunction, "plane wave");
    }
}

fn normalize_or_warn(wavefunction: &mut Wavefunction, label: &str) {
    if let Err(err) = wavefunction.normalize() {
        log::warn!("{} initial state left unnormalized: {}", label, err);
    }
}
