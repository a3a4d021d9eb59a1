//! Numerical defaults for the lattice simulation.

/// Constants of the lattice unit system (ħ = m = lattice spacing = 1).
pub mod wave_constants {
    /// Reduced Planck constant in lattice units.
    pub const HBAR: f64 = 1.0;
    /// Particle mass in lattice units.
    pub const MASS: f64 = 1.0;
    /// Default propagation time step.
    pub const DEFAULT_DELTA_TIME: f64 = 0.1;
    /// Default mesh count along each axis.
    pub const DEFAULT_MESH: usize = 64;
    /// Width, in cells, of the packet a measurement collapses to.
    pub const DEFAULT_COLLAPSE_WIDTH: f64 = 1.0;
    /// Smallest mesh count that still leaves an interior point.
    pub const MIN_MESH: usize = 2;
}
