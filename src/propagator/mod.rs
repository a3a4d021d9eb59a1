// src/propagator/mod.rs

//! Implicit time evolution of the lattice wavefunction.
//!
//! Solves `iħ ∂ψ/∂t = -ħ²/2m ∇²ψ + Vψ` with a Strang-split Crank–Nicolson
//! (alternating direction) scheme: half a step along x, a full step along y,
//! half a step along x. Each directional step is a Cayley transform
//! `(1 + iτH/2ħ)⁻¹ (1 − iτH/2ħ)` of a real symmetric tridiagonal Hamiltonian,
//! so every sweep is unconditionally stable and, with a zero boundary,
//! exactly unitary on the interior.

use crate::boundary::BoundaryCondition;
use crate::core::constants::wave_constants::{HBAR, MASS};
use crate::core::{GridPoint, WaveError, Wavefunction};
use crate::potentials::Potential;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};
use num_complex::Complex64;

/// Checks that a time step is usable by the propagator.
pub fn validate_delta_time(delta_time: f64) -> Result<(), WaveError> {
    if delta_time.is_finite() && delta_time > 0.0 {
        Ok(())
    } else {
        Err(WaveError::invalid(format!(
            "delta time must be positive and finite, got {}",
            delta_time
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepAxis {
    /// Lanes run along `i` for each fixed interior `j`.
    X,
    /// Lanes run along `j` for each fixed interior `i`.
    Y,
}

impl SweepAxis {
    fn fixed_axis(self) -> Axis {
        match self {
            SweepAxis::X => Axis(1),
            SweepAxis::Y => Axis(0),
        }
    }
}

/// Work buffers for one tridiagonal lane solve, reused across steps.
#[derive(Debug, Default, Clone)]
struct LaneScratch {
    diagonal: Vec<Complex64>,
    rhs: Vec<Complex64>,
    upper: Vec<Complex64>,
}

impl LaneScratch {
    fn resize(&mut self, unknowns: usize) {
        let zero = Complex64::new(0.0, 0.0);
        self.diagonal.resize(unknowns, zero);
        self.rhs.resize(unknowns, zero);
        self.upper.resize(unknowns, zero);
    }
}

/// The Crank–Nicolson propagator. Owns the time step and the simulation
/// clock; the potential and boundary condition are lent to it per call.
#[derive(Debug, Clone)]
pub struct CrankNicolsonPropagator {
    delta_time: f64,
    simulation_time: f64,
    potential_grid: Array2<f64>,
    scratch: LaneScratch,
}

impl CrankNicolsonPropagator {
    pub fn new(delta_time: f64) -> Result<Self, WaveError> {
        validate_delta_time(delta_time)?;
        Ok(Self {
            delta_time,
            simulation_time: 0.0,
            potential_grid: Array2::zeros((0, 0)),
            scratch: LaneScratch::default(),
        })
    }

    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Takes effect on the next [`propagate`](Self::propagate) call.
    pub fn set_delta_time(&mut self, delta_time: f64) -> Result<(), WaveError> {
        validate_delta_time(delta_time)?;
        self.delta_time = delta_time;
        Ok(())
    }

    /// Total time advanced by this propagator since construction or the last
    /// clock reset.
    pub fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    pub(crate) fn reset_clock(&mut self) {
        self.simulation_time = 0.0;
    }

    /// Advances `wavefunction` in place from `t` to `t + Δt`.
    ///
    /// The potential is sampled over the whole grid before any amplitude is
    /// touched, so a non-finite potential leaves the grid unchanged. The
    /// boundary ring is set from `boundary` at `t + Δt`; interior points are
    /// then updated by the implicit sweeps.
    pub fn propagate(
        &mut self,
        wavefunction: &mut Wavefunction,
        potential: &dyn Potential,
        boundary: &dyn BoundaryCondition,
    ) -> Result<(), WaveError> {
        validate_delta_time(self.delta_time)?;
        let (width, height) = (wavefunction.width(), wavefunction.height());
        self.sample_potential(potential, width, height)?;

        let next_time = self.simulation_time + self.delta_time;
        apply_boundary_ring(wavefunction, boundary, next_time);

        if width >= 3 && height >= 3 {
            let half = 0.5 * self.delta_time;
            self.sweep(wavefunction, SweepAxis::X, half)?;
            self.sweep(wavefunction, SweepAxis::Y, self.delta_time)?;
            self.sweep(wavefunction, SweepAxis::X, half)?;
        }

        self.simulation_time = next_time;
        Ok(())
    }

    fn sample_potential(
        &mut self,
        potential: &dyn Potential,
        width: usize,
        height: usize,
    ) -> Result<(), WaveError> {
        if self.potential_grid.dim() != (width, height) {
            self.potential_grid = Array2::zeros((width, height));
        }
        for ((i, j), cell) in self.potential_grid.indexed_iter_mut() {
            let value = potential.evaluate(i, j);
            if !value.is_finite() {
                return Err(WaveError::NonFinitePotential { point: GridPoint::new(i, j), value });
            }
            *cell = value;
        }
        Ok(())
    }

    fn sweep(&mut self, wavefunction: &mut Wavefunction, axis: SweepAxis, tau: f64) -> Result<(), WaveError> {
        let Self { potential_grid, scratch, .. } = self;
        let fixed = axis.fixed_axis();
        let values = wavefunction.values_mut();
        let lanes = values.len_of(fixed);
        for k in 1..lanes - 1 {
            let lane = values.index_axis_mut(fixed, k);
            let lane_potential = potential_grid.index_axis(fixed, k);
            solve_lane(lane, lane_potential, tau, scratch)?;
        }
        Ok(())
    }
}

/// Overwrites the outermost ring of the grid with boundary values at `time`.
fn apply_boundary_ring(wavefunction: &mut Wavefunction, boundary: &dyn BoundaryCondition, time: f64) {
    let (width, height) = (wavefunction.width(), wavefunction.height());
    let values = wavefunction.values_mut();
    for i in 0..width {
        values[(i, 0)] = boundary.value(i, 0, time);
        values[(i, height - 1)] = boundary.value(i, height - 1, time);
    }
    for j in 1..height.saturating_sub(1) {
        values[(0, j)] = boundary.value(0, j, time);
        values[(width - 1, j)] = boundary.value(width - 1, j, time);
    }
}

/// One Cayley step along a single lane. The lane's end points are fixed
/// (Dirichlet) and the interior is replaced by the solution of
/// `(1 + αH) ψ' = (1 − αH) ψ` with `α = iτ/2ħ` and
/// `H ψ_k = κ(2ψ_k − ψ_{k−1} − ψ_{k+1}) + ½V_k ψ_k`, `κ = ħ²/2m`.
fn solve_lane(
    mut psi: ArrayViewMut1<'_, Complex64>,
    potential: ArrayView1<'_, f64>,
    tau: f64,
    scratch: &mut LaneScratch,
) -> Result<(), WaveError> {
    let n = psi.len();
    if n < 3 {
        return Ok(());
    }
    let unknowns = n - 2;
    scratch.resize(unknowns);

    let kappa = HBAR * HBAR / (2.0 * MASS);
    let alpha = Complex64::new(0.0, tau / (2.0 * HBAR));
    let one = Complex64::new(1.0, 0.0);
    let off = -alpha * kappa;

    for u in 0..unknowns {
        let k = u + 1;
        let onsite = alpha * (2.0 * kappa + 0.5 * potential[k]);
        scratch.diagonal[u] = one + onsite;
        scratch.rhs[u] = (one - onsite) * psi[k] + alpha * kappa * (psi[k - 1] + psi[k + 1]);
    }
    // Known end points move from the left-hand side to the right.
    scratch.rhs[0] -= off * psi[0];
    scratch.rhs[unknowns - 1] -= off * psi[n - 1];

    thomas_solve(off, &scratch.diagonal, &mut scratch.rhs, &mut scratch.upper)?;

    for u in 0..unknowns {
        psi[u + 1] = scratch.rhs[u];
    }
    Ok(())
}

/// Solves a tridiagonal system with constant off-diagonal `off` in place:
/// on return `rhs` holds the solution.
fn thomas_solve(
    off: Complex64,
    diagonal: &[Complex64],
    rhs: &mut [Complex64],
    upper: &mut [Complex64],
) -> Result<(), WaveError> {
    let m = diagonal.len();
    let mut previous_upper = Complex64::new(0.0, 0.0);
    for k in 0..m {
        let denominator = if k == 0 { diagonal[0] } else { diagonal[k] - off * previous_upper };
        if denominator.norm() < f64::MIN_POSITIVE {
            return Err(WaveError::Instability {
                message: format!("singular pivot at row {} of a tridiagonal solve", k),
            });
        }
        upper[k] = off / denominator;
        rhs[k] = if k == 0 { rhs[0] / denominator } else { (rhs[k] - off * rhs[k - 1]) / denominator };
        previous_upper = upper[k];
    }
    for k in (0..m.saturating_sub(1)).rev() {
        let next = rhs[k + 1];
        rhs[k] -= upper[k] * next;
    }
    Ok(())
}
