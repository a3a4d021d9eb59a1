// src/boundary/mod.rs

//! Boundary conditions: the amplitude imposed at a lattice point at a given
//! simulation time. Used to clamp the grid edge and to drive wave sources.

use num_complex::Complex64;
use num_traits::Zero;
use std::fmt;

/// Supplies the amplitude to impose at `(i, j)` at `simulation_time`.
///
/// Implementations must be deterministic in their inputs.
pub trait BoundaryCondition: fmt::Debug {
    fn value(&self, i: usize, j: usize, simulation_time: f64) -> Complex64;
}

/// Clamps to zero everywhere, closing the system.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZeroBoundary;

impl BoundaryCondition for ZeroBoundary {
    fn value(&self, _i: usize, _j: usize, _simulation_time: f64) -> Complex64 {
        Complex64::zero()
    }
}

/// A continuous plane-wave emitter, `A·exp(i(kx·i + ky·j − ω·t))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousWave {
    pub amplitude: f64,
    pub kx: f64,
    pub ky: f64,
    pub angular_frequency: f64,
}

impl ContinuousWave {
    pub fn new(amplitude: f64, kx: f64, ky: f64, angular_frequency: f64) -> Self {
        Self { amplitude, kx, ky, angular_frequency }
    }

    /// Emitter whose frequency follows the free-particle dispersion
    /// `ω = (kx² + ky²) / 2` in lattice units.
    pub fn free_particle(amplitude: f64, kx: f64, ky: f64) -> Self {
        Self::new(amplitude, kx, ky, 0.5 * (kx * kx + ky * ky))
    }
}

impl BoundaryCondition for ContinuousWave {
    fn value(&self, i: usize, j: usize, simulation_time: f64) -> Complex64 {
        let phase = self.kx * i as f64 + self.ky * j as f64 - self.angular_frequency * simulation_time;
        Complex64::from_polar(self.amplitude, phase)
    }
}
