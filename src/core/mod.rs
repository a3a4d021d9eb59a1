// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod grid;
pub mod state;

pub use error::WaveError;
pub use grid::{GridPoint, Region};
pub use state::Wavefunction;

/// Complex probability amplitude. `+`, `*`, `conj()`, `norm()` and `Copy`
/// come from `num_complex`.
pub type Amplitude = num_complex::Complex64;

pub mod constants;
pub use constants::wave_constants::{DEFAULT_DELTA_TIME, HBAR, MASS};
