//! Error handling logic

use super::grid::GridPoint;
use thiserror::Error;

/// Error types raised by the wavefunction simulator.
///
/// Configuration problems are rejected at the API boundary, numerical
/// invariant violations are surfaced to the immediate caller. Nothing in the
/// crate retries: a failed step leaves the decision to the driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveError {
    /// Invalid dimensions, time step, widths or indices.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was rejected and why
        message: String,
    },

    /// A grid coordinate outside the current grid.
    #[error("Point {point} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending coordinate
        point: GridPoint,
        /// Grid width (xmesh + 1)
        width: usize,
        /// Grid height (ymesh + 1)
        height: usize,
    },

    /// The potential evaluated to NaN or infinity.
    #[error("Non-finite potential {value} at {point}")]
    NonFinitePotential {
        /// Where the potential was evaluated
        point: GridPoint,
        /// The value returned by the potential
        value: f64,
    },

    /// Collapse sampling exhausted the interior without reaching the sampled
    /// threshold. Signals a normalization bug and must not be masked.
    #[error("No collapse point: {message}")]
    NoCollapsePoint {
        /// NoCollapsePoint failure message
        message: String,
    },

    /// The evolution produced non-finite amplitudes or hit a singular solve.
    #[error("Numerical instability: {message}")]
    Instability {
        /// Instability failure message
        message: String,
    },

    /// A combination of settings the simulator does not support.
    #[error("Unsupported configuration: {message}")]
    Unsupported {
        /// Unsupported failure message
        message: String,
    },
}

impl WaveError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        WaveError::InvalidConfiguration { message: message.into() }
    }
}
