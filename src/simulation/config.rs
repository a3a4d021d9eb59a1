// src/simulation/config.rs

use crate::core::constants::wave_constants::{DEFAULT_COLLAPSE_WIDTH, DEFAULT_DELTA_TIME, DEFAULT_MESH, MIN_MESH};
use crate::core::WaveError;
use crate::propagator::validate_delta_time;
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`DiscreteModel`](super::DiscreteModel).
///
/// Every field has a default, so a partial JSON/TOML document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_mesh")]
    pub xmesh: usize,
    #[serde(default = "default_mesh")]
    pub ymesh: usize,
    #[serde(default = "default_delta_time")]
    pub delta_time: f64,
    #[serde(default = "default_detection_causes_collapse")]
    pub detection_causes_collapse: bool,
    /// Width (standard deviation, in cells) of the post-measurement packet.
    #[serde(default = "default_collapse_width")]
    pub collapse_width: f64,
    /// Seed for the collapse sampling generator; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_mesh() -> usize {
    DEFAULT_MESH
}

fn default_delta_time() -> f64 {
    DEFAULT_DELTA_TIME
}

fn default_detection_causes_collapse() -> bool {
    true
}

fn default_collapse_width() -> f64 {
    DEFAULT_COLLAPSE_WIDTH
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            xmesh: default_mesh(),
            ymesh: default_mesh(),
            delta_time: default_delta_time(),
            detection_causes_collapse: default_detection_causes_collapse(),
            collapse_width: default_collapse_width(),
            seed: None,
        }
    }
}

impl ModelConfig {
    pub fn with_mesh(mut self, xmesh: usize, ymesh: usize) -> Self {
        self.xmesh = xmesh;
        self.ymesh = ymesh;
        self
    }

    pub fn with_delta_time(mut self, delta_time: f64) -> Self {
        self.delta_time = delta_time;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), WaveError> {
        validate_mesh(self.xmesh, self.ymesh)?;
        validate_delta_time(self.delta_time)?;
        validate_collapse_width(self.collapse_width)
    }
}

pub(crate) fn validate_mesh(xmesh: usize, ymesh: usize) -> Result<(), WaveError> {
    if xmesh < MIN_MESH || ymesh < MIN_MESH {
        return Err(WaveError::invalid(format!(
            "mesh must be at least {}x{}, got {}x{}",
            MIN_MESH, MIN_MESH, xmesh, ymesh
        )));
    }
    Ok(())
}

pub(crate) fn validate_collapse_width(width: f64) -> Result<(), WaveError> {
    if !(width.is_finite() && width > 0.0) {
        return Err(WaveError::invalid(format!("collapse width must be positive and finite, got {}", width)));
    }
    Ok(())
}
