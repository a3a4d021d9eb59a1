// src/simulation/results.rs
use crate::core::GridPoint;
use std::fmt;

/// A detector that fired during a step, and where the grid collapsed to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Index of the detector in registration order.
    pub detector: usize,
    /// The detector's probability at the moment it fired.
    pub probability: f64,
    /// Collapse point (the detector's geometric center).
    pub point: GridPoint,
}

/// Holds the outcome of a single completed `step()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Step counter after this step.
    pub time_step: u64,
    /// Simulation clock after this step.
    pub simulation_time: f64,
    /// The last detector that fired and collapsed the grid this step.
    pub detection: Option<Detection>,
}

impl StepOutcome {
    pub fn collapsed(&self) -> bool {
        self.detection.is_some()
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "detector #{} fired (p={:.4}) -> {}", self.detector, self.probability, self.point)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} t={:.4}", self.time_step, self.simulation_time)?;
        if let Some(detection) = &self.detection {
            write!(f, ": {}", detection)?;
        }
        Ok(())
    }
}
