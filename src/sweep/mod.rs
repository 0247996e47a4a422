//! Parameter sweeps
//!
//! A sweep runs one simulation per grid point and detects ignition on each
//! trajectory.
//!
//! ```text
//! RunTemplate ──┐
//!               ├─► SimulationRun per grid point ─► advance ─► Trajectory ─► IgnitionDetector
//! SweepGrid ────┘                                                   │                │
//!                                                                   └────► SweepTable ◄┘
//! ```
//!
//! # Failure policy
//!
//! The sweep is all or nothing. The reactor mode and every run are validated
//! before the simulator is called once; after that, the first failing grid
//! point (in visiting order) aborts the sweep and is named in the error.
//!
//! # Example
//!
//! ```rust
//! use ignite_rs::models::GlobalMethaneKinetics;
//! use ignite_rs::solver::SimulationHorizon;
//! use ignite_rs::sweep::{Parameter, RunTemplate, SweepAxis, SweepGrid, SweepOrchestrator, SweepSettings};
//!
//! let simulator = GlobalMethaneKinetics::default();
//! let settings = SweepSettings::new(SimulationHorizon::duration(0.5, 1e-3)).stop_at_ignition(true);
//!
//! let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![1.0, 4.0]));
//! let template = RunTemplate::new(1300.0, 1.0, "CH4:1, O2:2, N2:7.52".parse().unwrap(), "constant pressure");
//!
//! let table = SweepOrchestrator::new(&simulator, settings).run(&grid, &template).unwrap();
//! assert_eq!(table.len(), 2);
//! ```

mod grid;
mod table;

pub use grid::{GridPoint, Parameter, RunTemplate, SweepAxis, SweepGrid};
pub use table::{SweepRecord, SweepTable};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{StudyError, StudyResult};
use crate::ignition::{DetectionRule, IgnitionDetector};
use crate::physics::ReactorSimulator;
use crate::solver::{advance, advance_with, SimulationHorizon, SimulationRun, StepControl};

// =================================================================================================
// Settings
// =================================================================================================

/// How every run of a sweep is advanced and judged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSettings {
    pub horizon: SimulationHorizon,
    pub detector: IgnitionDetector,

    /// Stop advancing a run once ignition is detected
    pub stop_at_ignition: bool,

    /// Run grid points on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl SweepSettings {
    /// Full horizon, cumulative-rise detection, sequential
    pub fn new(horizon: SimulationHorizon) -> Self {
        Self {
            horizon,
            detector: IgnitionDetector::default(),
            stop_at_ignition: false,
            parallel: false,
        }
    }

    /// Builder pattern: set the detection rule, keeping the threshold
    pub fn detection(mut self, rule: DetectionRule) -> Self {
        self.detector = IgnitionDetector::new(rule).with_threshold(self.detector.threshold());
        self
    }

    /// Builder pattern: set the ignition threshold \[K\]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.detector = self.detector.with_threshold(threshold);
        self
    }

    pub fn stop_at_ignition(mut self, stop: bool) -> Self {
        self.stop_at_ignition = stop;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> StudyResult<()> {
        self.horizon.validate()?;
        let threshold = self.detector.threshold();
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(StudyError::config(format!(
                "ignition threshold must be positive, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Orchestrator
// =================================================================================================

/// Runs a simulator over a sweep grid
pub struct SweepOrchestrator<'a> {
    simulator: &'a dyn ReactorSimulator,
    settings: SweepSettings,
}

impl<'a> SweepOrchestrator<'a> {
    pub fn new(simulator: &'a dyn ReactorSimulator, settings: SweepSettings) -> Self {
        Self { simulator, settings }
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Run every grid point and collect the result table
    ///
    /// # Errors
    ///
    /// - unknown reactor mode → [`StudyError::UnknownReactorMode`], before any simulation
    /// - invalid grid, horizon or run → configuration error, before any simulation
    /// - simulator failure → [`StudyError::GridPoint`] naming the point
    pub fn run(&self, grid: &SweepGrid, template: &RunTemplate) -> StudyResult<SweepTable> {
        // ====== Step 1: Validation ======

        let mode = template.reactor_mode()?;
        self.settings.validate()?;
        grid.validate()?;

        let points = grid.points();
        let mut runs = Vec::with_capacity(points.len());
        for point in &points {
            let run = template
                .instantiate(mode, point)
                .map_err(|error| at_point(point, error))?;
            runs.push(run);
        }

        info!(
            "sweep over {} grid points ({}, {}, threshold {} K)",
            points.len(),
            mode,
            self.settings.detector.rule(),
            self.settings.detector.threshold()
        );

        // ====== Step 2: Simulation ======

        let jobs: Vec<(GridPoint, SimulationRun)> = points.into_iter().zip(runs).collect();
        let records = self.execute(jobs)?;

        // ====== Step 3: Collection ======

        let table = SweepTable::new(grid.clone(), records);
        info!("sweep done: {}/{} grid points ignited", table.ignited_count(), table.len());

        Ok(table)
    }

    #[cfg(feature = "parallel")]
    fn execute(&self, jobs: Vec<(GridPoint, SimulationRun)>) -> StudyResult<Vec<SweepRecord>> {
        if !self.settings.parallel {
            return self.execute_sequential(jobs);
        }

        use rayon::prelude::*;

        // collect() keeps index order, so the first error below is the first in grid order
        let results: Vec<StudyResult<SweepRecord>> = jobs
            .into_par_iter()
            .map(|(point, run)| self.simulate_point(point, run))
            .collect();

        results.into_iter().collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn execute(&self, jobs: Vec<(GridPoint, SimulationRun)>) -> StudyResult<Vec<SweepRecord>> {
        if self.settings.parallel {
            debug!("parallel sweep requested but the `parallel` feature is off; running sequentially");
        }
        self.execute_sequential(jobs)
    }

    fn execute_sequential(&self, jobs: Vec<(GridPoint, SimulationRun)>) -> StudyResult<Vec<SweepRecord>> {
        jobs.into_iter()
            .map(|(point, run)| self.simulate_point(point, run))
            .collect()
    }

    /// Simulate one grid point and detect ignition on its trajectory
    fn simulate_point(&self, point: GridPoint, run: SimulationRun) -> StudyResult<SweepRecord> {
        let detector = self.settings.detector;
        let horizon = &self.settings.horizon;

        let trajectory = if self.settings.stop_at_ignition {
            let mut watch = detector.watch(run.initial_temperature());
            advance_with(self.simulator, &run, horizon, |sample| {
                if watch.observe_sample(sample) {
                    StepControl::Stop
                } else {
                    StepControl::Continue
                }
            })
        } else {
            advance(self.simulator, &run, horizon)
        }
        .map_err(|error| at_point(&point, error))?;

        let ignition = detector.detect(&trajectory, run.initial_temperature());

        match ignition.delay {
            Some(_) => debug!("[{}] ignition delay {}", point, ignition),
            None => warn!(
                "[{}] no ignition within {} s ({} samples)",
                point,
                horizon.total_time(),
                trajectory.len()
            ),
        }

        Ok(SweepRecord {
            point,
            run,
            trajectory,
            ignition,
        })
    }
}

fn at_point(point: &GridPoint, error: StudyError) -> StudyError {
    StudyError::GridPoint {
        index: point.index.clone(),
        point: point.to_string(),
        source: Box::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::physics::{Reactor, ThermoState};
    use nalgebra::DVector;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Heats by a fixed jump at t = 0.5 s * (1 atm / P)
    struct StepHeating {
        initial_temperature: f64,
        ignition_time: f64,
        time: f64,
    }

    impl Reactor for StepHeating {
        fn species_names(&self) -> Vec<String> {
            vec!["N2".to_string()]
        }

        fn state(&self) -> ThermoState {
            let jump = if self.time >= self.ignition_time { 1500.0 } else { 0.0 };
            ThermoState::new(self.initial_temperature + jump, 101_325.0, 1.0, DVector::from_element(1, 1.0))
        }

        fn advance(&mut self, time: f64) -> Result<ThermoState, SimulationError> {
            self.time = time;
            Ok(self.state())
        }
    }

    #[derive(Default)]
    struct CountingSimulator {
        calls: AtomicUsize,
    }

    impl ReactorSimulator for CountingSimulator {
        fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StepHeating {
                initial_temperature: run.initial_temperature(),
                ignition_time: 0.5 / run.initial_pressure_atm(),
                time: 0.0,
            }))
        }

        fn name(&self) -> &str {
            "Counting"
        }
    }

    fn template(reactor: &str) -> RunTemplate {
        RunTemplate::new(1000.0, 1.0, "CH4:1, O2:2".parse().unwrap(), reactor)
    }

    fn settings() -> SweepSettings {
        SweepSettings::new(SimulationHorizon::duration(1.0, 0.01))
    }

    #[test]
    fn test_unknown_mode_fails_before_simulating() {
        let simulator = CountingSimulator::default();
        let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![1.0, 2.0]));

        let error = SweepOrchestrator::new(&simulator, settings())
            .run(&grid, &template("isochoric"))
            .unwrap_err();

        assert!(matches!(error, StudyError::UnknownReactorMode(ref mode) if mode == "isochoric"));
        assert_eq!(simulator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_point_fails_before_simulating() {
        let simulator = CountingSimulator::default();
        let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Temperature, vec![1000.0, -5.0]));

        let error = SweepOrchestrator::new(&simulator, settings())
            .run(&grid, &template("constant pressure"))
            .unwrap_err();

        assert!(matches!(error, StudyError::GridPoint { ref index, .. } if index == &vec![1]));
        assert!(error.is_configuration());
        assert_eq!(simulator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_at_ignition_truncates_trajectories() {
        let simulator = CountingSimulator::default();
        let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![1.0, 2.0]));

        let table = SweepOrchestrator::new(&simulator, settings().stop_at_ignition(true))
            .run(&grid, &template("constant pressure"))
            .unwrap();

        let first = table.get(&[0]).unwrap();
        assert!((first.ignition.delay.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(first.trajectory.last().unwrap().time, first.ignition.delay.unwrap());

        let second = table.get(&[1]).unwrap();
        assert!((second.ignition.delay.unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_settings_builders() {
        let settings = settings().threshold(250.0).detection(DetectionRule::ConsecutiveDelta);
        assert_eq!(settings.detector.threshold(), 250.0);
        assert_eq!(settings.detector.rule(), DetectionRule::ConsecutiveDelta);
        assert!(settings.threshold(0.0).validate().is_err());
    }

    #[test]
    fn test_table_lookup() {
        let simulator = CountingSimulator::default();
        let grid = SweepGrid::two_axis(
            SweepAxis::new(Parameter::Pressure, vec![1.0, 2.0]),
            SweepAxis::new(Parameter::Temperature, vec![900.0, 1000.0, 1100.0]),
        );

        let table = SweepOrchestrator::new(&simulator, settings())
            .run(&grid, &template("constant temperature"))
            .unwrap();

        assert_eq!(table.len(), 6);
        assert_eq!(table.get(&[1, 2]).unwrap().run.initial_temperature(), 1100.0);
        assert!(table.get(&[1, 3]).is_none());
        assert!(table.get(&[1]).is_none());
        assert!(table.get(&[2, 0]).is_none());
        assert!(table.get(&[usize::MAX, 1]).is_none());

        let matrix = table.delay_matrix();
        assert_eq!(matrix.dim(), (2, 3));
        assert!(matrix.iter().all(Option::is_some));
    }
}
