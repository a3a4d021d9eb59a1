// src/potentials/mod.rs

//! Real-valued potential fields over the lattice.
//!
//! A [`Potential`] maps a lattice coordinate to a potential energy. The
//! [`CompositePotential`] owned by the model superposes any number of them.
//! Evaluation is always recomputed on demand; nothing is cached.

use crate::core::{GridPoint, Region};
use std::fmt;

/// Base contract for any potential contributor.
pub trait Potential: fmt::Debug {
    /// Potential energy at lattice point `(i, j)`.
    fn evaluate(&self, i: usize, j: usize) -> f64;
}

/// Ordered superposition of potential contributors.
///
/// Evaluates to the sum of every registered contributor; an empty composite
/// is zero everywhere.
#[derive(Debug, Default)]
pub struct CompositePotential {
    potentials: Vec<Box<dyn Potential>>,
}

impl CompositePotential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_potential(&mut self, potential: Box<dyn Potential>) {
        self.potentials.push(potential);
    }

    /// Removes and returns the contributor at `index`, if any.
    pub fn remove_potential(&mut self, index: usize) -> Option<Box<dyn Potential>> {
        if index < self.potentials.len() {
            Some(self.potentials.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.potentials.clear();
    }

    pub fn len(&self) -> usize {
        self.potentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }

    pub fn potential_at(&self, index: usize) -> Option<&dyn Potential> {
        self.potentials.get(index).map(|p| &**p)
    }
}

impl Potential for CompositePotential {
    fn evaluate(&self, i: usize, j: usize) -> f64 {
        self.potentials.iter().map(|p| p.evaluate(i, j)).sum()
    }
}

/// The same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPotential {
    pub value: f64,
}

impl ConstantPotential {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Potential for ConstantPotential {
    fn evaluate(&self, _i: usize, _j: usize) -> f64 {
        self.value
    }
}

/// A flat barrier (positive value) or well (negative value) over a region,
/// zero elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangularPotential {
    pub region: Region,
    pub value: f64,
}

impl RectangularPotential {
    pub fn new(region: Region, value: f64) -> Self {
        Self { region, value }
    }
}

impl Potential for RectangularPotential {
    fn evaluate(&self, i: usize, j: usize) -> f64 {
        if self.region.contains(i, j) { self.value } else { 0.0 }
    }
}

/// A sloping potential `slope_x·i + slope_y·j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientPotential {
    pub slope_x: f64,
    pub slope_y: f64,
}

impl GradientPotential {
    pub fn new(slope_x: f64, slope_y: f64) -> Self {
        Self { slope_x, slope_y }
    }

    /// Potential rising along x only.
    pub fn along_x(slope: f64) -> Self {
        Self::new(slope, 0.0)
    }
}

impl Potential for GradientPotential {
    fn evaluate(&self, i: usize, j: usize) -> f64 {
        self.slope_x * i as f64 + self.slope_y * j as f64
    }
}

/// Isotropic harmonic well `½·k·r²` around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicWell {
    pub center: GridPoint,
    pub stiffness: f64,
}

impl HarmonicWell {
    pub fn new(center: GridPoint, stiffness: f64) -> Self {
        Self { center, stiffness }
    }
}

impl Potential for HarmonicWell {
    fn evaluate(&self, i: usize, j: usize) -> f64 {
        let r = self.center.distance_to(&GridPoint::new(i, j));
        0.5 * self.stiffness * r * r
    }
}

/// A horizontal wall with two gaps, symmetric about the middle column.
///
/// The wall occupies rows `[y, y + thickness)`. Each slit is `slit_width`
/// cells wide and the inner edges of the two slits are `slit_separation`
/// cells apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleSlit {
    pub xmesh: usize,
    pub y: usize,
    pub thickness: usize,
    pub slit_width: usize,
    pub slit_separation: usize,
    pub value: f64,
}

impl DoubleSlit {
    pub fn new(
        xmesh: usize,
        y: usize,
        thickness: usize,
        slit_width: usize,
        slit_separation: usize,
        value: f64,
    ) -> Self {
        Self { xmesh, y, thickness, slit_width, slit_separation, value }
    }

    /// Column ranges `[start, end)` of the two openings.
    pub fn slits(&self) -> [(usize, usize); 2] {
        let middle = self.xmesh / 2;
        let half_gap = self.slit_separation / 2;
        let left_end = middle.saturating_sub(half_gap);
        let left_start = left_end.saturating_sub(self.slit_width);
        let right_start = middle + (self.slit_separation - half_gap);
        let right_end = right_start + self.slit_width;
        [(left_start, left_end), (right_start, right_end)]
    }
}

impl Potential for DoubleSlit {
    fn evaluate(&self, i: usize, j: usize) -> f64 {
        if j < self.y || j >= self.y + self.thickness {
            return 0.0;
        }
        let in_slit = self.slits().iter().any(|&(start, end)| i >= start && i < end);
        if in_slit { 0.0 } else { self.value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_composite_is_additive() {
        let mut composite = CompositePotential::new();
        let barrier = RectangularPotential::new(Region::new(2, 2, 3, 3), 5.0);
        let slope = GradientPotential::along_x(0.5);
        composite.add_potential(Box::new(barrier));
        composite.add_potential(Box::new(slope));

        for (i, j) in [(0, 0), (3, 3), (4, 2), (7, 1)] {
            let expected = barrier.evaluate(i, j) + slope.evaluate(i, j);
            assert_relative_eq!(composite.evaluate(i, j), expected);
        }
        assert_eq!(composite.len(), 2);
    }

    #[test]
    fn test_clear_returns_zero_everywhere() {
        let mut composite = CompositePotential::new();
        composite.add_potential(Box::new(ConstantPotential::new(3.0)));
        composite.add_potential(Box::new(HarmonicWell::new(GridPoint::new(4, 4), 2.0)));
        composite.clear();
        assert!(composite.is_empty());
        for i in 0..8 {
            for j in 0..8 {
                assert_eq!(composite.evaluate(i, j), 0.0);
            }
        }
    }

    #[test]
    fn test_remove_potential() {
        let mut composite = CompositePotential::new();
        composite.add_potential(Box::new(ConstantPotential::new(1.0)));
        composite.add_potential(Box::new(ConstantPotential::new(10.0)));
        assert!(composite.remove_potential(0).is_some());
        assert!(composite.remove_potential(5).is_none());
        assert_relative_eq!(composite.evaluate(0, 0), 10.0);
        let remaining = composite.potential_at(0).map(|p| p.evaluate(3, 3));
        assert_eq!(remaining, Some(10.0));
        assert!(composite.potential_at(1).is_none());
    }

    #[test]
    fn test_harmonic_well() {
        let well = HarmonicWell::new(GridPoint::new(5, 5), 2.0);
        assert_relative_eq!(well.evaluate(5, 5), 0.0);
        assert_relative_eq!(well.evaluate(8, 9), 25.0);
    }

    #[test]
    fn test_double_slit_openings() {
        let slit = DoubleSlit::new(40, 18, 2, 4, 6, 100.0);
        assert_eq!(slit.slits(), [(13, 17), (23, 27)]);
        // Outside the wall rows.
        assert_eq!(slit.evaluate(0, 10), 0.0);
        // Solid wall.
        assert_eq!(slit.evaluate(5, 18), 100.0);
        assert_eq!(slit.evaluate(20, 19), 100.0);
        // Openings.
        assert_eq!(slit.evaluate(14, 18), 0.0);
        assert_eq!(slit.evaluate(26, 19), 0.0);
        assert_eq!(slit.evaluate(27, 19), 100.0);
    }
}
