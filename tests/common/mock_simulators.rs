//! Mock reactor simulators for testing
//!
//! These simulators have known ignition behaviour, making them
//! ideal for checking detection and sweep orchestration without kinetics.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::DVector;

use ignite_rs::error::SimulationError;
use ignite_rs::physics::{Reactor, ReactorSimulator, ThermoState, ONE_ATMOSPHERE};
use ignite_rs::solver::{ReactorMode, SimulationRun};

// =================================================================================================
// Shared reactor
// =================================================================================================

/// Reactor whose temperature jumps by `jump` once `ignition_time` is reached
///
/// `ignition_time = None` never ignites.
pub struct StepReactor {
    species: Vec<String>,
    fractions: DVector<f64>,
    initial_temperature: f64,
    pressure: f64,
    ignition_time: Option<f64>,
    jump: f64,
    time: f64,
}

impl StepReactor {
    fn new(run: &SimulationRun, ignition_time: Option<f64>, jump: f64) -> Self {
        let fractions = run.composition().mole_fractions();
        Self {
            species: fractions.iter().map(|(s, _)| s.to_string()).collect(),
            fractions: DVector::from_iterator(fractions.len(), fractions.iter().map(|(_, x)| *x)),
            initial_temperature: run.initial_temperature(),
            pressure: run.initial_pressure(),
            ignition_time,
            jump,
            time: 0.0,
        }
    }

    fn temperature_at(&self, time: f64) -> f64 {
        match self.ignition_time {
            Some(t_ign) if time >= t_ign - 1e-12 => self.initial_temperature + self.jump,
            _ => self.initial_temperature,
        }
    }
}

impl Reactor for StepReactor {
    fn species_names(&self) -> Vec<String> {
        self.species.clone()
    }

    fn state(&self) -> ThermoState {
        ThermoState::new(self.temperature_at(self.time), self.pressure, 1.0, self.fractions.clone())
    }

    fn advance(&mut self, time: f64) -> Result<ThermoState, SimulationError> {
        self.time = time;
        Ok(self.state())
    }
}

// =================================================================================================
// Step heating: ignition delay inversely proportional to pressure
// =================================================================================================

/// Ignites at `delay_at_one_atm / P[atm]`, jumping by 1500 K
///
/// Rigid-vessel runs ignite twice as fast as constant-pressure runs so the
/// two modes are distinguishable.
pub struct StepHeating {
    pub delay_at_one_atm: f64,
}

impl StepHeating {
    pub fn new(delay_at_one_atm: f64) -> Self {
        Self { delay_at_one_atm }
    }

    /// Analytical ignition time of a run
    pub fn ignition_time(&self, run: &SimulationRun) -> f64 {
        let delay = self.delay_at_one_atm / (run.initial_pressure() / ONE_ATMOSPHERE);
        match run.reactor_mode() {
            ReactorMode::ConstantPressure => delay,
            ReactorMode::ConstantTemperature => delay / 2.0,
        }
    }
}

impl ReactorSimulator for StepHeating {
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
        Ok(Box::new(StepReactor::new(run, Some(self.ignition_time(run)), 1500.0)))
    }

    fn name(&self) -> &str {
        "Step Heating"
    }
}

// =================================================================================================
// Inert: never ignites
// =================================================================================================

/// Temperature rises by `drift` (below any threshold) at t = 0.001 s and stays there
pub struct Inert {
    pub drift: f64,
}

impl ReactorSimulator for Inert {
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
        Ok(Box::new(StepReactor::new(run, Some(1e-3), self.drift)))
    }

    fn name(&self) -> &str {
        "Inert"
    }
}

// =================================================================================================
// Failing: errors for one initial pressure
// =================================================================================================

/// Behaves like [`StepHeating`] except at `failing_pressure_atm`
pub struct FailingAt {
    pub failing_pressure_atm: f64,
    pub inner: StepHeating,
}

impl ReactorSimulator for FailingAt {
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
        if (run.initial_pressure_atm() - self.failing_pressure_atm).abs() < 1e-9 {
            return Err(SimulationError::Engine(format!(
                "solver diverged at {} atm",
                self.failing_pressure_atm
            )));
        }
        self.inner.reactor(run)
    }

    fn name(&self) -> &str {
        "Failing"
    }
}

// =================================================================================================
// Counting wrapper
// =================================================================================================

/// Counts how many reactors were built by the wrapped simulator
pub struct Counting<S> {
    pub inner: S,
    calls: AtomicUsize,
}

impl<S> Counting<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: ReactorSimulator> ReactorSimulator for Counting<S> {
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.reactor(run)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
