//! Reactor simulator traits and types
//!
//! This module defines the seam between the ignition study and the chemistry:
//! - `ThermoState`: instantaneous thermodynamic state of a reactor
//! - `Reactor`: one reactor being advanced in time
//! - `ReactorSimulator`: factory building reactors from a `SimulationRun`
//!
//! Reaction kinetics and equations of state live behind these traits. The
//! stepping loop, ignition detection and sweeps only ever see `ThermoState`.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::solver::SimulationRun;

// =================================================================================================
// Thermodynamic state
// =================================================================================================

/// Thermodynamic state of a homogeneous reactor at one instant
///
/// # Example
/// ```
/// use ignite_rs::physics::ThermoState;
/// use nalgebra::DVector;
///
/// let state = ThermoState::new(1250.0, 101_325.0, 1.0, DVector::from_vec(vec![0.1, 0.9]));
/// assert_eq!(state.temperature, 1250.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoState {
    /// Temperature \[K\]
    pub temperature: f64,

    /// Pressure \[Pa\]
    pub pressure: f64,

    /// Reactor volume \[m³\]
    pub volume: f64,

    /// Mole fractions, ordered like [`Reactor::species_names`]
    pub mole_fractions: DVector<f64>,
}

impl ThermoState {
    pub fn new(temperature: f64, pressure: f64, volume: f64, mole_fractions: DVector<f64>) -> Self {
        Self {
            temperature,
            pressure,
            volume,
            mole_fractions,
        }
    }

    /// First non-finite quantity, if any
    pub fn non_finite_quantity(&self) -> Option<&'static str> {
        if !self.temperature.is_finite() {
            Some("temperature")
        } else if !self.pressure.is_finite() {
            Some("pressure")
        } else if !self.volume.is_finite() {
            Some("volume")
        } else if self.mole_fractions.iter().any(|x| !x.is_finite()) {
            Some("mole fractions")
        } else {
            None
        }
    }
}

// ==================================================================================================
// Reactor traits
// =================================================================================================

/// A reactor being advanced in time
///
/// Mirrors a reactor network of a kinetics engine: it holds the current
/// chemical state and integrates up to an absolute time on request.
pub trait Reactor {
    /// Species tracked by this reactor, in mole-fraction order
    fn species_names(&self) -> Vec<String>;

    /// Current state (at the last time reached)
    fn state(&self) -> ThermoState;

    /// Integrate up to the absolute time `time` \[s\] and return the state there
    ///
    /// `time` is always greater than the last time reached.
    fn advance(&mut self, time: f64) -> Result<ThermoState, SimulationError>;
}

/// Trait for reactor simulators
///
/// # Responsibility
/// Given a `SimulationRun` (initial temperature, pressure, composition and
/// reactor mode), builds a `Reactor` that can be advanced in time. The
/// simulator owns the chemistry; it does NOT decide when a run stops.
///
/// Implementations must accept both reactor modes.
pub trait ReactorSimulator: Send + Sync {
    /// Build a reactor initialised at the run's state
    fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError>;

    /// Name of the simulator (used for display and logging)
    fn name(&self) -> &str;

    /// Description of the simulator (option)
    fn description(&self) -> Option<&str> {
        None
    }
}

// =================================================================================================
// Tests
// =================================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_state() {
        let state = ThermoState::new(300.0, 101_325.0, 1.0, DVector::from_vec(vec![0.2, 0.8]));
        assert_eq!(state.non_finite_quantity(), None);
    }

    #[test]
    fn test_non_finite_quantity_is_named() {
        let mut state = ThermoState::new(300.0, 101_325.0, 1.0, DVector::from_vec(vec![0.2, 0.8]));
        state.pressure = f64::INFINITY;
        assert_eq!(state.non_finite_quantity(), Some("pressure"));

        state.temperature = f64::NAN;
        assert_eq!(state.non_finite_quantity(), Some("temperature"));
    }

    #[test]
    fn test_nan_mole_fraction() {
        let state = ThermoState::new(300.0, 1.0, 1.0, DVector::from_vec(vec![f64::NAN]));
        assert_eq!(state.non_finite_quantity(), Some("mole fractions"));
    }
}
