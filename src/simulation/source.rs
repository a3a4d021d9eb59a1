// src/simulation/source.rs

use crate::boundary::BoundaryCondition;
use crate::core::{Region, Wavefunction};

/// A continuous emitter: before every propagation step it overwrites each
/// grid cell inside its region with the boundary condition's value at the
/// current simulation time.
#[derive(Debug)]
pub struct WaveSource {
    region: Region,
    boundary: Box<dyn BoundaryCondition>,
}

impl WaveSource {
    pub fn new(region: Region, boundary: Box<dyn BoundaryCondition>) -> Self {
        Self { region, boundary }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Writes the source values into the part of the region that lies on
    /// the grid.
    pub fn apply(&self, wavefunction: &mut Wavefunction, simulation_time: f64) {
        let (width, height) = (wavefunction.width(), wavefunction.height());
        let values = wavefunction.values_mut();
        for (i, j) in self.region.cells_within(width, height) {
            values[(i, j)] = self.boundary.value(i, j, simulation_time);
        }
    }
}
