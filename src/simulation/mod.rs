// src/simulation/mod.rs

//! The discrete model: owns the grid, potential, propagator, detectors,
//! wave sources and listeners, and drives the step loop.

pub mod config;
pub mod detector;
pub mod listener;
mod measurement;
pub mod results;
pub mod source;

pub use config::ModelConfig;
pub use detector::{Detector, DetectorSet};
pub use listener::{ListenerId, ModelListener, SharedListener};
pub use results::{Detection, StepOutcome};
pub use source::WaveSource;

use crate::boundary::{BoundaryCondition, ZeroBoundary};
use crate::core::{GridPoint, WaveError, Wavefunction};
use crate::initial::{EmptyWave, GaussianWave, InitialWavefunction};
use crate::potentials::{CompositePotential, Potential};
use crate::propagator::CrankNicolsonPropagator;
use crate::validation;
use listener::ListenerRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// A time-stepped Schrödinger simulation on a `(xmesh + 1) × (ymesh + 1)`
/// lattice.
///
/// Single-threaded: every mutation happens before the listener notifications
/// of the call that caused it. Listeners are only notified of content changes
/// by [`step`](Self::step); `fire_particle`, `collapse`, `measure` and `reset`
/// rewrite the grid silently.
pub struct DiscreteModel {
    wavefunction: Wavefunction,
    potential: CompositePotential,
    propagator: CrankNicolsonPropagator,
    time_step: u64,
    initial_wavefunction: Box<dyn InitialWavefunction>,
    boundary_condition: Box<dyn BoundaryCondition>,
    listeners: ListenerRegistry,
    detectors: DetectorSet,
    sources: Vec<WaveSource>,
    detection_causes_collapse: bool,
    collapse_width: f64,
    rng: StdRng,
}

impl DiscreteModel {
    /// Builds a model and initializes its grid from `initial_wavefunction`.
    pub fn new(
        xmesh: usize,
        ymesh: usize,
        delta_time: f64,
        initial_wavefunction: Box<dyn InitialWavefunction>,
        boundary_condition: Box<dyn BoundaryCondition>,
    ) -> Result<Self, WaveError> {
        let config = ModelConfig::default().with_mesh(xmesh, ymesh).with_delta_time(delta_time);
        Self::from_config(&config, initial_wavefunction, boundary_condition)
    }

    /// An empty grid with a zero boundary and the default time step.
    pub fn with_mesh(xmesh: usize, ymesh: usize) -> Result<Self, WaveError> {
        let config = ModelConfig::default().with_mesh(xmesh, ymesh);
        Self::from_config(&config, Box::new(EmptyWave), Box::new(ZeroBoundary))
    }

    pub fn from_config(
        config: &ModelConfig,
        initial_wavefunction: Box<dyn InitialWavefunction>,
        boundary_condition: Box<dyn BoundaryCondition>,
    ) -> Result<Self, WaveError> {
        config.validate()?;
        let mut wavefunction = Wavefunction::zeros(config.xmesh, config.ymesh);
        initial_wavefunction.initialize(&mut wavefunction);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        log::debug!(
            "created {}x{} model, dt={}, initial={:?}, boundary={:?}",
            config.xmesh,
            config.ymesh,
            config.delta_time,
            initial_wavefunction,
            boundary_condition
        );
        Ok(Self {
            wavefunction,
            potential: CompositePotential::new(),
            propagator: CrankNicolsonPropagator::new(config.delta_time)?,
            time_step: 0,
            initial_wavefunction,
            boundary_condition,
            listeners: ListenerRegistry::default(),
            detectors: DetectorSet::new(),
            sources: Vec::new(),
            detection_causes_collapse: config.detection_causes_collapse,
            collapse_width: config.collapse_width,
            rng,
        })
    }

    // --- Grid and clock accessors ---

    /// Read-only view of the grid for renderers and analysis.
    pub fn wavefunction(&self) -> &Wavefunction {
        &self.wavefunction
    }

    pub fn xmesh(&self) -> usize {
        self.wavefunction.xmesh()
    }

    pub fn ymesh(&self) -> usize {
        self.wavefunction.ymesh()
    }

    /// Number of completed propagation steps.
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Simulation clock seen by boundary conditions and wave sources.
    pub fn simulation_time(&self) -> f64 {
        self.propagator.simulation_time()
    }

    pub fn delta_time(&self) -> f64 {
        self.propagator.delta_time()
    }

    /// Takes effect on the next step.
    pub fn set_delta_time(&mut self, delta_time: f64) -> Result<(), WaveError> {
        self.propagator.set_delta_time(delta_time)?;
        log::debug!("delta time set to {}", delta_time);
        Ok(())
    }

    // --- Stepping ---

    /// Advances the simulation by one time step.
    ///
    /// Order: wave sources write their regions, the propagator advances the
    /// grid, the result is checked for finiteness, the counter increments,
    /// listeners are notified, then detectors are updated and may collapse
    /// the grid. Propagation errors leave the counter unchanged.
    pub fn step(&mut self) -> Result<StepOutcome, WaveError> {
        let now = self.propagator.simulation_time();
        for source in &self.sources {
            source.apply(&mut self.wavefunction, now);
        }

        self.propagator
            .propagate(&mut self.wavefunction, &self.potential, &*self.boundary_condition)?;
        validation::check_finite(&self.wavefunction)?;

        self.time_step += 1;
        log::trace!("finished step {} at t={}", self.time_step, self.simulation_time());
        self.notify_finished_time_step();

        let detection = self.process_detectors()?;
        Ok(StepOutcome {
            time_step: self.time_step,
            simulation_time: self.simulation_time(),
            detection,
        })
    }

    /// Per-frame driver entry point. The frame interval is ignored: the
    /// model always advances by its own `delta_time`.
    pub fn step_in_time(&mut self, _dt: f64) -> Result<StepOutcome, WaveError> {
        self.step()
    }

    /// Every detector draws against the probability it held before any
    /// collapse this step. Each one that fires collapses the grid, so the
    /// last firing detector decides where the particle ends up.
    fn process_detectors(&mut self) -> Result<Option<Detection>, WaveError> {
        self.detectors.update_all(&self.wavefunction);
        if !self.detection_causes_collapse {
            return Ok(None);
        }

        let (width, height) = (self.wavefunction.width(), self.wavefunction.height());
        let mut fired = Vec::new();
        for (index, detector) in self.detectors.iter().enumerate() {
            let draw: f64 = self.rng.random();
            if draw <= detector.probability() {
                let center = detector.center();
                let point = GridPoint::new(center.i.min(width - 1), center.j.min(height - 1));
                fired.push(Detection { detector: index, probability: detector.probability(), point });
            }
        }

        for detection in &fired {
            log::info!("{}", detection);
            self.collapse(detection.point)?;
        }
        Ok(fired.pop())
    }

    // --- Initial state and resizing ---

    /// Re-initializes the grid with `initial_wavefunction` without touching
    /// the step counter or the configured strategy.
    pub fn fire_particle(&mut self, initial_wavefunction: &dyn InitialWavefunction) {
        log::debug!("firing particle {:?} at step {}", initial_wavefunction, self.time_step);
        initial_wavefunction.initialize(&mut self.wavefunction);
    }

    /// Replaces the grid content with `wavefunction`, which must have the
    /// current dimensions. Resizing goes through
    /// [`set_grid_spacing`](Self::set_grid_spacing) so listeners see a size
    /// change.
    pub fn set_wavefunction(&mut self, wavefunction: Wavefunction) -> Result<(), WaveError> {
        if wavefunction.xmesh() != self.xmesh() || wavefunction.ymesh() != self.ymesh() {
            return Err(WaveError::Unsupported {
                message: format!(
                    "cannot load a {}x{} grid into a {}x{} model; resize with set_grid_spacing first",
                    wavefunction.xmesh(),
                    wavefunction.ymesh(),
                    self.xmesh(),
                    self.ymesh()
                ),
            });
        }
        self.wavefunction = wavefunction;
        Ok(())
    }

    /// Reallocates the grid when either dimension changes, re-initializes it
    /// from the configured strategy and notifies `size_changed`. A call with
    /// the current dimensions does nothing.
    pub fn set_grid_spacing(&mut self, xmesh: usize, ymesh: usize) -> Result<(), WaveError> {
        config::validate_mesh(xmesh, ymesh)?;
        if xmesh == self.xmesh() && ymesh == self.ymesh() {
            return Ok(());
        }
        log::debug!("resizing grid {}x{} -> {}x{}", self.xmesh(), self.ymesh(), xmesh, ymesh);
        let mut wavefunction = Wavefunction::zeros(xmesh, ymesh);
        self.initial_wavefunction.initialize(&mut wavefunction);
        self.wavefunction = wavefunction;
        self.notify_size_changed();
        Ok(())
    }

    /// Re-initializes the grid from the configured strategy and restarts the
    /// step counter and clock.
    pub fn reset(&mut self) {
        self.initial_wavefunction.initialize(&mut self.wavefunction);
        self.time_step = 0;
        self.propagator.reset_clock();
        log::debug!("model reset");
    }

    /// Strategy used on resize and reset. Does not touch the current grid.
    pub fn set_initial_wavefunction(&mut self, initial_wavefunction: Box<dyn InitialWavefunction>) {
        self.initial_wavefunction = initial_wavefunction;
    }

    /// Takes effect on the next step.
    pub fn set_boundary_condition(&mut self, boundary_condition: Box<dyn BoundaryCondition>) {
        log::debug!("boundary condition set to {:?}", boundary_condition);
        self.boundary_condition = boundary_condition;
    }

    // --- Potential ---

    pub fn potential(&self) -> &CompositePotential {
        &self.potential
    }

    pub fn potential_count(&self) -> usize {
        self.potential.len()
    }

    pub fn add_potential(&mut self, potential: Box<dyn Potential>) {
        log::debug!("adding potential {:?}", potential);
        self.potential.add_potential(potential);
        self.notify_potential_changed();
    }

    pub fn remove_potential(&mut self, index: usize) -> Result<Box<dyn Potential>, WaveError> {
        let removed = self
            .potential
            .remove_potential(index)
            .ok_or_else(|| WaveError::invalid(format!("no potential at index {}", index)))?;
        self.notify_potential_changed();
        Ok(removed)
    }

    /// Removes every potential term; the potential is zero everywhere
    /// afterwards.
    pub fn clear_potential(&mut self) {
        self.potential.clear();
        self.notify_potential_changed();
    }

    // --- Detectors and sources ---

    /// Registers a detector and returns its index.
    pub fn add_detector(&mut self, detector: Detector) -> usize {
        self.detectors.add(detector)
    }

    pub fn remove_detector(&mut self, index: usize) -> Result<Detector, WaveError> {
        self.detectors
            .remove(index)
            .ok_or_else(|| WaveError::invalid(format!("no detector at index {}", index)))
    }

    pub fn clear_detectors(&mut self) {
        self.detectors.clear();
    }

    pub fn detectors(&self) -> &DetectorSet {
        &self.detectors
    }

    pub fn detection_causes_collapse(&self) -> bool {
        self.detection_causes_collapse
    }

    /// With collapse disabled, detectors still track their probability.
    pub fn set_detection_causes_collapse(&mut self, enabled: bool) {
        self.detection_causes_collapse = enabled;
    }

    /// Sources are applied in insertion order before every propagation.
    pub fn add_wave_source(&mut self, source: WaveSource) {
        self.sources.push(source);
    }

    pub fn clear_wave_sources(&mut self) {
        self.sources.clear();
    }

    pub fn wave_source_count(&self) -> usize {
        self.sources.len()
    }

    // --- Measurement ---

    /// Samples a point from `|ψ|²` over the interior of the grid. The grid
    /// itself is not modified.
    ///
    /// Mass on the boundary ring is excluded from the sample space; the
    /// interior is renormalized to one before sampling.
    ///
    /// # Errors
    /// `WaveError::NoCollapsePoint` if the interior carries no probability or
    /// the cumulative scan never reaches the sampled threshold.
    pub fn sample_collapse_point(&mut self) -> Result<GridPoint, WaveError> {
        measurement::sample_collapse_point(&self.wavefunction, &mut self.rng)
    }

    /// Replaces the grid with a stationary Gaussian of width
    /// `collapse_width` centered on `point`.
    pub fn collapse(&mut self, point: GridPoint) -> Result<(), WaveError> {
        if !self.wavefunction.contains(point.i, point.j) {
            return Err(WaveError::OutOfBounds {
                point,
                width: self.wavefunction.width(),
                height: self.wavefunction.height(),
            });
        }
        GaussianWave::stationary(point, self.collapse_width)?.initialize(&mut self.wavefunction);
        log::info!("collapsed wavefunction to {} at step {}", point, self.time_step);
        Ok(())
    }

    /// Forced measurement: samples a collapse point and collapses there.
    pub fn measure(&mut self) -> Result<GridPoint, WaveError> {
        let point = self.sample_collapse_point()?;
        self.collapse(point)?;
        Ok(point)
    }

    pub fn collapse_width(&self) -> f64 {
        self.collapse_width
    }

    pub fn set_collapse_width(&mut self, width: f64) -> Result<(), WaveError> {
        config::validate_collapse_width(width)?;
        self.collapse_width = width;
        Ok(())
    }

    /// Reseeds the sampling generator used by detectors and collapse sampling.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // --- Listeners ---

    pub fn add_listener(&mut self, listener: SharedListener) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify_finished_time_step(&self) {
        for listener in self.listeners.snapshot() {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.finished_time_step(self),
                Err(_) => log::warn!("listener already borrowed; skipped finished_time_step"),
            }
        }
    }

    fn notify_size_changed(&self) {
        for listener in self.listeners.snapshot() {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.size_changed(),
                Err(_) => log::warn!("listener already borrowed; skipped size_changed"),
            }
        }
    }

    fn notify_potential_changed(&self) {
        for listener in self.listeners.snapshot() {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.potential_changed(),
                Err(_) => log::warn!("listener already borrowed; skipped potential_changed"),
            }
        }
    }
}

impl fmt::Debug for DiscreteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteModel")
            .field("xmesh", &self.xmesh())
            .field("ymesh", &self.ymesh())
            .field("time_step", &self.time_step)
            .field("simulation_time", &self.simulation_time())
            .field("delta_time", &self.delta_time())
            .field("potentials", &self.potential.len())
            .field("detectors", &self.detectors.len())
            .field("sources", &self.sources.len())
            .field("listeners", &self.listeners.len())
            .field("detection_causes_collapse", &self.detection_causes_collapse)
            .finish()
    }
}
