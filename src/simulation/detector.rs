// src/simulation/detector.rs

use crate::core::{GridPoint, Region, Wavefunction};
use std::fmt;

/// A rectangular region of interest that accumulates the fraction of total
/// probability `|ψ|²` lying inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detector {
    region: Region,
    probability: f64,
}

impl Detector {
    pub fn new(region: Region) -> Self {
        Self { region, probability: 0.0 }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Probability computed by the last [`update_probability`](Self::update_probability).
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Geometric center of the region. Detector-triggered collapse lands
    /// here, not on the densest cell inside the region.
    pub fn center(&self) -> GridPoint {
        self.region.center()
    }

    /// Recomputes the in-region probability relative to the grid total. An
    /// all-zero grid yields zero.
    pub fn update_probability(&mut self, wavefunction: &Wavefunction) {
        let total = wavefunction.total_probability();
        self.probability = if total > 0.0 {
            wavefunction.probability_in(&self.region) / total
        } else {
            0.0
        };
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Detector{} p={:.4}", self.region, self.probability)
    }
}

/// The model's registered detectors, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DetectorSet {
    detectors: Vec<Detector>,
}

impl DetectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a detector and returns its index.
    pub fn add(&mut self, detector: Detector) -> usize {
        self.detectors.push(detector);
        self.detectors.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Detector> {
        if index < self.detectors.len() {
            Some(self.detectors.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.detectors.clear();
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Detector> {
        self.detectors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detector> {
        self.detectors.iter()
    }

    pub fn update_all(&mut self, wavefunction: &Wavefunction) {
        for detector in &mut self.detectors {
            detector.update_probability(wavefunction);
        }
    }
}
