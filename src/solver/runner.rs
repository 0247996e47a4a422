//! Stepping driver
//!
//! Advances a reactor over a [`SimulationHorizon`], sampling it at fixed
//! output times and recording each sample into a [`Trajectory`].
//!
//! # Algorithm
//!
//! 1. Build the reactor from the run
//! 2. Record the initial state at t = 0
//! 3. For each output step n = 0, 1, ..., N-1:
//!    - advance the reactor to t = (n + 1) · dt
//!    - validate and record the sample
//!    - ask the observer whether to continue
//! 4. Return the trajectory
//!
//! The reactor chooses its own internal integration steps; the horizon only
//! fixes where it is sampled.

use log::{debug, trace};

use crate::error::StudyResult;
use crate::physics::ReactorSimulator;
use crate::solver::{validate_state, Sample, SimulationHorizon, SimulationRun, Trajectory};

/// Observer verdict after each sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
    Continue,
    Stop,
}

/// Advance a run over the whole horizon
///
/// # Example
///
/// ```rust,ignore
/// let trajectory = advance(&simulator, &run, &SimulationHorizon::duration(10.0, 2e-4))?;
/// println!("{} samples", trajectory.len());
/// ```
pub fn advance(
    simulator: &dyn ReactorSimulator,
    run: &SimulationRun,
    horizon: &SimulationHorizon,
) -> StudyResult<Trajectory> {
    advance_with(simulator, run, horizon, |_| StepControl::Continue)
}

/// Advance a run, consulting `observer` after every recorded sample
///
/// The observer sees each sample once, in time order, including the initial
/// sample at t = 0. Returning [`StepControl::Stop`] ends the run early; the
/// trajectory then ends with the sample the observer stopped on.
pub fn advance_with<F>(
    simulator: &dyn ReactorSimulator,
    run: &SimulationRun,
    horizon: &SimulationHorizon,
    mut observer: F,
) -> StudyResult<Trajectory>
where
    F: FnMut(&Sample) -> StepControl,
{
    // ====== Step 1: Validation ======

    horizon.validate()?;

    // ====== Step 2: Setup ======

    let dt = horizon.time_step();
    let time_steps = horizon.time_steps();

    let mut reactor = simulator.reactor(run)?;
    let mut trajectory = Trajectory::with_capacity(reactor.species_names(), time_steps.min(1 << 16) + 1);

    let initial = Sample::new(0.0, reactor.state());
    validate_state(&initial.state, 0.0)?;
    trajectory.push(initial)?;

    let mut stopped_at = None;
    if let Some(first) = trajectory.last()
        && observer(first) == StepControl::Stop
    {
        stopped_at = Some(0);
    }

    // ====== Step 3: Sampling loop ======

    if stopped_at.is_none() {
        for step in 0..time_steps {
            // Computed from the index, not accumulated, so the last sample
            // lands on the horizon without rounding drift
            let time = (step as f64 + 1.0) * dt;

            let state = reactor.advance(time)?;
            validate_state(&state, time)?;
            trajectory.push(Sample::new(time, state))?;

            if let Some(sample) = trajectory.last()
                && observer(sample) == StepControl::Stop
            {
                stopped_at = Some(step + 1);
                break;
            }
        }
    }

    trace!("{}: {} samples recorded", simulator.name(), trajectory.len());
    if let Some(step) = stopped_at {
        debug!("run [{}] stopped early at sample {}", run, step);
    }

    // ====== Step 4: Metadata ======

    trajectory.add_metadata("simulator", simulator.name());
    trajectory.add_metadata("reactor mode", run.reactor_mode().name());
    trajectory.add_metadata("time step", &dt.to_string());
    trajectory.add_metadata("time steps", &time_steps.to_string());
    trajectory.add_metadata("stopped early", &stopped_at.is_some().to_string());

    Ok(trajectory)
}

// =================================================================================================
// Tests
// =================================================================================================
