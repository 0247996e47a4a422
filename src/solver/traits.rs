//! Stepping configuration and trajectory types
//!
//! # Design Philosophy
//!
//! - `SimulationHorizon` says HOW LONG a reactor is advanced and at which
//!   sampling step. It is always explicit configuration, never a literal
//!   buried in a stepping loop.
//! - `Trajectory` is the append-only record of one run: samples are pushed in
//!   time order and the push checks that order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SimulationError, StudyError, StudyResult};
use crate::physics::ThermoState;

// ============================================================================
// Simulation horizon
// ============================================================================

/// How far and how finely a run is advanced
///
/// # Examples
///
/// ```rust
/// use ignite_rs::solver::SimulationHorizon;
///
/// // 10 s sampled every 0.2 ms
/// let horizon = SimulationHorizon::duration(10.0, 2e-4);
/// assert_eq!(horizon.time_steps(), 50_000);
///
/// // fixed budget of 10 000 samples, 0.5 ms apart
/// let horizon = SimulationHorizon::steps(10_000, 5e-4);
/// assert!((horizon.total_time() - 5.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationHorizon {
    /// Fixed simulated duration
    ///
    /// # Parameters
    /// - `total_time`: simulated duration \[s\]
    /// - `time_step`: sampling interval \[s\]
    Duration { total_time: f64, time_step: f64 },

    /// Fixed number of samples
    ///
    /// # Parameters
    /// - `time_steps`: number of samples after the initial state
    /// - `time_step`: sampling interval \[s\]
    Steps { time_steps: usize, time_step: f64 },
}

impl SimulationHorizon {
    pub fn duration(total_time: f64, time_step: f64) -> Self {
        Self::Duration { total_time, time_step }
    }

    pub fn steps(time_steps: usize, time_step: f64) -> Self {
        Self::Steps { time_steps, time_step }
    }

    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SimulationHorizon::Duration { .. } => "Duration",
            SimulationHorizon::Steps { .. } => "Steps",
        }
    }

    /// Sampling interval \[s\]
    pub fn time_step(&self) -> f64 {
        match self {
            SimulationHorizon::Duration { time_step, .. } | SimulationHorizon::Steps { time_step, .. } => {
                *time_step
            }
        }
    }

    /// Number of samples after the initial one
    ///
    /// A duration that is not a whole number of steps is truncated.
    pub fn time_steps(&self) -> usize {
        match self {
            SimulationHorizon::Duration { total_time, time_step } => {
                // Nudge before truncating so 10.0 / 2e-4 gives 50000, not 49999
                ((total_time / time_step) * (1.0 + 1e-12)).floor() as usize
            }
            SimulationHorizon::Steps { time_steps, .. } => *time_steps,
        }
    }

    /// Time of the last sample \[s\]
    pub fn total_time(&self) -> f64 {
        self.time_steps() as f64 * self.time_step()
    }

    /// Validate that parameters are physically meaningful
    pub fn validate(&self) -> StudyResult<()> {
        let time_step = self.time_step();
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(StudyError::config(format!("time step must be positive, got {}", time_step)));
        }
        match self {
            SimulationHorizon::Duration { total_time, .. } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err(StudyError::config(format!(
                        "total time must be positive, got {}",
                        total_time
                    )));
                }
                if self.time_steps() == 0 {
                    return Err(StudyError::config("time step is longer than the total time"));
                }
            }
            SimulationHorizon::Steps { time_steps, .. } => {
                if *time_steps == 0 {
                    return Err(StudyError::config("time steps must be greater than 0"));
                }
            }
        }
        Ok(())
    }
}

// =================================================================================================
// Trajectory
// =================================================================================================

/// One recorded instant of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Elapsed simulated time \[s\]
    pub time: f64,

    /// Full thermodynamic state at `time`
    pub state: ThermoState,
}

impl Sample {
    pub fn new(time: f64, state: ThermoState) -> Self {
        Self { time, state }
    }

    /// Temperature \[K\]
    pub fn temperature(&self) -> f64 {
        self.state.temperature
    }
}

/// Time-ordered record of one run
///
/// # Invariants
///
/// - sample times are strictly increasing
/// - temperatures are finite
///
/// Both are checked by [`Trajectory::push`], the only way to add a sample.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trajectory {
    species: Vec<String>,
    samples: Vec<Sample>,
    metadata: BTreeMap<String, String>,
}

impl Trajectory {
    /// Create an empty trajectory for the given species
    pub fn new(species: Vec<String>) -> Self {
        Self {
            species,
            samples: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_capacity(species: Vec<String>, capacity: usize) -> Self {
        Self {
            species,
            samples: Vec::with_capacity(capacity),
            metadata: BTreeMap::new(),
        }
    }

    /// Append a sample
    ///
    /// # Errors
    ///
    /// - time not strictly after the previous sample
    /// - non-finite temperature
    pub fn push(&mut self, sample: Sample) -> Result<(), SimulationError> {
        if !sample.time.is_finite() {
            return Err(SimulationError::NonFinite { quantity: "time", time: sample.time });
        }
        if let Some(last) = self.samples.last()
            && sample.time <= last.time
        {
            return Err(SimulationError::NonMonotonicTime {
                previous: last.time,
                next: sample.time,
            });
        }
        if !sample.temperature().is_finite() {
            return Err(SimulationError::NonFinite {
                quantity: "temperature",
                time: sample.time,
            });
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Sample times \[s\]
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Sample temperatures \[K\]
    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::temperature).collect()
    }

    /// Sample pressures \[Pa\]
    pub fn pressures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.state.pressure).collect()
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
