// tests/simulation_tests.rs

// Import necessary types from the wavegrid crate
use wavegrid::{
    BoundaryCondition, ConstantPotential, ContinuousWave, Detector, DiscreteModel, EmptyWave, GaussianWave,
    GradientPotential, HarmonicWell, InitialWavefunction, ModelConfig, ModelListener, Potential, Region,
    WaveError, WaveSource, Wavefunction, ZeroBoundary,
};
use wavegrid::core::GridPoint;

use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Helper building a seeded model with a Gaussian packet and zero boundary
fn packet_model(
    mesh: usize,
    center: (f64, f64),
    momentum: (f64, f64),
    width: f64,
    seed: u64,
) -> Result<DiscreteModel, WaveError> {
    init_logging();
    let config = ModelConfig::default().with_mesh(mesh, mesh).with_seed(seed);
    let packet = GaussianWave::new(center, momentum, width)?;
    DiscreteModel::from_config(&config, Box::new(packet), Box::new(ZeroBoundary))
}

#[test]
fn test_norm_conserved_over_many_steps() -> Result<(), WaveError> {
    let mut model = packet_model(32, (16.0, 16.0), (0.3, -0.2), 3.0, 1)?;
    let initial = model.wavefunction().total_probability();
    assert_relative_eq!(initial, 1.0, epsilon = 1e-12);

    for _ in 0..200 {
        model.step()?;
    }
    assert_eq!(model.time_step(), 200);
    wavegrid::check_normalization(model.wavefunction(), Some(1e-5))?;
    Ok(())
}

#[test]
fn test_bounded_under_static_potential() -> Result<(), WaveError> {
    let mut model = packet_model(24, (9.0, 12.0), (0.0, 0.0), 2.0, 2)?;
    model.add_potential(Box::new(HarmonicWell::new(GridPoint::new(12, 12), 0.05)));
    model.set_delta_time(2.0)?;

    for _ in 0..100 {
        model.step()?;
        let peak = model.wavefunction().values().iter().map(|c| c.norm()).fold(0.0, f64::max);
        assert!(peak <= 1.0 + 1e-9, "amplitude grew to {}", peak);
    }
    wavegrid::validate_state(model.wavefunction(), Some(1e-4))?;
    Ok(())
}

#[test]
fn test_packet_moves_with_its_momentum() -> Result<(), WaveError> {
    let mut model = packet_model(48, (24.0, 16.0), (0.0, 0.5), 3.0, 3)?;
    let (x0, y0) = model.wavefunction().expected_position().expect("non-zero");
    for _ in 0..40 {
        model.step()?;
    }
    let (x1, y1) = model.wavefunction().expected_position().expect("non-zero");
    assert_relative_eq!(x1, x0, epsilon = 1e-6);
    let moved = y1 - y0;
    assert!(moved > 1.0 && moved < 3.0, "moved {} cells", moved);
    Ok(())
}

#[test]
fn test_gradient_pushes_packet_downhill() -> Result<(), WaveError> {
    let mut model = packet_model(40, (20.0, 20.0), (0.0, 0.0), 3.0, 4)?;
    model.add_potential(Box::new(GradientPotential::along_x(0.05)));
    for _ in 0..80 {
        model.step()?;
    }
    let (x, _) = model.wavefunction().expected_position().expect("non-zero");
    assert!(x < 20.0 - 0.5, "packet stayed at x = {}", x);
    Ok(())
}

#[test]
fn test_resize_reinitializes_from_strategy() -> Result<(), WaveError> {
    let packet = GaussianWave::new((6.0, 6.0), (0.0, 0.0), 1.5)?;
    let mut model = DiscreteModel::new(12, 12, 0.1, Box::new(packet), Box::new(ZeroBoundary))?;
    model.step()?;
    model.set_grid_spacing(20, 16)?;

    let mut expected = Wavefunction::zeros(20, 16);
    packet.initialize(&mut expected);
    assert_eq!(model.wavefunction().width(), 21);
    assert_eq!(model.wavefunction().height(), 17);
    assert_eq!(model.wavefunction(), &expected);
    assert_eq!(model.time_step(), 1);
    Ok(())
}

#[test]
fn test_composite_potential_through_model() -> Result<(), WaveError> {
    let mut model = DiscreteModel::with_mesh(10, 10)?;
    model.add_potential(Box::new(ConstantPotential::new(1.5)));
    model.add_potential(Box::new(wavegrid::RectangularPotential::new(Region::new(2, 2, 3, 3), 10.0)));

    assert_relative_eq!(model.potential().evaluate(3, 3), 11.5);
    assert_relative_eq!(model.potential().evaluate(8, 8), 1.5);

    model.clear_potential();
    for i in 0..=10 {
        for j in 0..=10 {
            assert_eq!(model.potential().evaluate(i, j), 0.0);
        }
    }
    Ok(())
}

#[test]
fn test_delta_time_change_applies_to_next_step() -> Result<(), WaveError> {
    let mut changed = packet_model(16, (8.0, 8.0), (0.2, 0.0), 2.0, 5)?;
    changed.set_delta_time(0.5)?;
    changed.set_delta_time(0.1)?;
    changed.step()?;

    let mut fresh = packet_model(16, (8.0, 8.0), (0.2, 0.0), 2.0, 5)?;
    fresh.step()?;

    assert_relative_eq!(changed.simulation_time(), 0.1, epsilon = 1e-12);
    assert_eq!(changed.wavefunction(), fresh.wavefunction());
    assert!(changed.set_delta_time(-1.0).is_err());
    assert_relative_eq!(changed.delta_time(), 0.1);
    Ok(())
}

#[test]
fn test_full_grid_detector_probability_is_one() -> Result<(), WaveError> {
    let mut model = packet_model(20, (10.0, 10.0), (0.1, 0.1), 2.0, 6)?;
    model.set_detection_causes_collapse(false);
    model.add_detector(Detector::new(Region::full_grid(20, 20)));
    model.add_detector(Detector::new(Region::new(0, 0, 3, 3)));
    for _ in 0..5 {
        model.step()?;
    }
    let probabilities: Vec<f64> = model.detectors().iter().map(Detector::probability).collect();
    assert_relative_eq!(probabilities[0], 1.0, epsilon = 1e-9);
    assert!(probabilities[1] < 1e-3);
    Ok(())
}

#[test]
fn test_detector_collapse_lands_on_detector_center() -> Result<(), WaveError> {
    let mut model = packet_model(30, (15.0, 15.0), (0.0, 0.0), 2.0, 7)?;
    let index = model.add_detector(Detector::new(Region::new(10, 10, 11, 11)));

    let mut detection = None;
    for _ in 0..50 {
        if let Some(found) = model.step()?.detection {
            detection = Some(found);
            break;
        }
    }
    let detection = detection.expect("a detector holding most of the mass fires");
    assert_eq!(detection.detector, index);
    assert_eq!(detection.point, GridPoint::new(15, 15));

    let (x, y) = model.wavefunction().expected_position().expect("collapsed grid is non-zero");
    assert_relative_eq!(x, 15.0, epsilon = 1e-6);
    assert_relative_eq!(y, 15.0, epsilon = 1e-6);
    assert_relative_eq!(model.wavefunction().total_probability(), 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_detector_outside_mass_never_fires() -> Result<(), WaveError> {
    let mut model = packet_model(30, (8.0, 8.0), (0.0, 0.0), 1.5, 8)?;
    model.add_detector(Detector::new(Region::new(26, 26, 4, 4)));
    for _ in 0..20 {
        assert!(model.step()?.detection.is_none());
    }
    Ok(())
}

#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

struct NamedListener {
    name: &'static str,
    log: Rc<RefCell<EventLog>>,
}

impl ModelListener for NamedListener {
    fn finished_time_step(&mut self, model: &DiscreteModel) {
        self.log.borrow_mut().events.push(format!("{}:{}", self.name, model.time_step()));
    }

    fn size_changed(&mut self) {
        self.log.borrow_mut().events.push(format!("{}:size", self.name));
    }
}

#[test]
fn test_listeners_notified_in_insertion_order() -> Result<(), WaveError> {
    let mut model = DiscreteModel::with_mesh(8, 8)?;
    let log = Rc::new(RefCell::new(EventLog::default()));
    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let listener = Rc::new(RefCell::new(NamedListener { name, log: Rc::clone(&log) }));
        ids.push(model.add_listener(listener));
    }

    model.step()?;
    assert!(model.remove_listener(ids[1]));
    assert!(!model.remove_listener(ids[1]));
    model.step()?;
    model.set_grid_spacing(10, 10)?;

    assert_eq!(log.borrow().events, vec!["a:1", "b:1", "c:1", "a:2", "c:2", "a:size", "c:size"]);
    assert_eq!(model.listener_count(), 2);
    Ok(())
}

#[test]
fn test_busy_listener_is_skipped() -> Result<(), WaveError> {
    let mut model = DiscreteModel::with_mesh(6, 6)?;
    let log = Rc::new(RefCell::new(EventLog::default()));
    let listener = Rc::new(RefCell::new(NamedListener { name: "x", log: Rc::clone(&log) }));
    model.add_listener(listener.clone());

    let guard = listener.borrow();
    model.step()?;
    drop(guard);
    model.step()?;
    assert_eq!(log.borrow().events, vec!["x:2"]);
    Ok(())
}

#[test]
fn test_wave_source_injects_amplitude() -> Result<(), WaveError> {
    let mut model = DiscreteModel::new(16, 16, 0.1, Box::new(EmptyWave), Box::new(ZeroBoundary))?;
    let emitter = ContinuousWave::free_particle(1.0, 0.0, 0.5);
    model.add_wave_source(WaveSource::new(Region::new(7, 7, 2, 2), Box::new(emitter)));
    assert_eq!(model.wave_source_count(), 1);

    model.step()?;
    let total = model.wavefunction().total_probability();
    assert!(total > 1.0, "source injected only {}", total);
    let near = model.wavefunction().probability_in(&Region::new(4, 4, 8, 8));
    assert!(near / total > 0.9);

    model.clear_wave_sources();
    model.step()?;
    assert_eq!(model.wave_source_count(), 0);
    Ok(())
}

#[test]
fn test_continuous_wave_boundary_drives_ring() -> Result<(), WaveError> {
    let emitter = ContinuousWave::free_particle(0.1, 0.4, 0.0);
    let mut model = DiscreteModel::new(12, 12, 0.1, Box::new(EmptyWave), Box::new(emitter))?;
    model.step()?;
    model.step()?;

    let t = model.simulation_time();
    let wf = model.wavefunction();
    for &(i, j) in &[(0, 0), (0, 5), (12, 7), (4, 12), (9, 0)] {
        let expected = emitter.value(i, j, t);
        let actual = wf[(i, j)];
        assert_relative_eq!(actual.re, expected.re, epsilon = 1e-12);
        assert_relative_eq!(actual.im, expected.im, epsilon = 1e-12);
    }
    assert!(wf.interior_probability() > 0.0);
    Ok(())
}

#[test]
fn test_non_finite_potential_is_rejected_before_stepping() -> Result<(), WaveError> {
    let mut model = packet_model(10, (5.0, 5.0), (0.0, 0.0), 1.0, 9)?;
    model.add_potential(Box::new(ConstantPotential::new(f64::NAN)));
    let before = model.wavefunction().clone();
    assert!(matches!(model.step(), Err(WaveError::NonFinitePotential { .. })));
    assert_eq!(model.time_step(), 0);
    assert_eq!(model.wavefunction(), &before);
    Ok(())
}

#[test]
fn test_config_from_json() -> Result<(), WaveError> {
    init_logging();
    let config: ModelConfig = serde_json::from_str(r#"{ "xmesh": 16, "seed": 5, "collapse_width": 2.0 }"#)
        .expect("valid json");
    assert_eq!(config.xmesh, 16);
    assert_eq!(config.ymesh, 64);
    assert_eq!(config.seed, Some(5));
    assert!(config.detection_causes_collapse);

    let model = DiscreteModel::from_config(&config, Box::new(EmptyWave), Box::new(ZeroBoundary))?;
    assert_eq!((model.xmesh(), model.ymesh()), (16, 64));
    assert_relative_eq!(model.collapse_width(), 2.0);

    let bad: ModelConfig = serde_json::from_str(r#"{ "delta_time": 0.0 }"#).expect("valid json");
    let result = DiscreteModel::from_config(&bad, Box::new(EmptyWave), Box::new(ZeroBoundary));
    assert!(matches!(result, Err(WaveError::InvalidConfiguration { .. })));
    Ok(())
}
