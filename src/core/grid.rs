// src/core/grid.rs

//! Lattice geometry: grid coordinates and rectangular regions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lattice coordinate `(i, j)`, `i` along x and `j` along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column index, `0..=xmesh`
    pub i: usize,
    /// Row index, `0..=ymesh`
    pub j: usize,
}

impl GridPoint {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Euclidean distance to another lattice point, in cells.
    pub fn distance_to(&self, other: &GridPoint) -> f64 {
        let di = self.i as f64 - other.i as f64;
        let dj = self.j as f64 - other.j as f64;
        (di * di + dj * dj).sqrt()
    }
}

impl From<(usize, usize)> for GridPoint {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// An axis-aligned rectangle of lattice cells, `[x, x + width) × [y, y + height)`.
///
/// Regions may extend past the grid; consumers clip against the grid they
/// are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// A region covering a whole `(xmesh + 1) × (ymesh + 1)` grid.
    pub fn full_grid(xmesh: usize, ymesh: usize) -> Self {
        Self::new(0, 0, xmesh + 1, ymesh + 1)
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i >= self.x && i < self.x + self.width && j >= self.y && j < self.y + self.height
    }

    /// Geometric center, rounded down to the enclosing cell.
    pub fn center(&self) -> GridPoint {
        GridPoint::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cells of the region that fall inside a grid of the given size, row-major
    /// (`i` outer, `j` inner).
    pub fn cells_within(&self, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
        let i_end = (self.x + self.width).min(width);
        let j_start = self.y;
        let j_end = (self.y + self.height).min(height);
        (self.x..i_end).flat_map(move |i| (j_start..j_end).map(move |j| (i, j)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}; {}x{}]", self.x, self.y, self.width, self.height)
    }
}
