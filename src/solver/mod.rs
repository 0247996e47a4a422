//! Run definition and time stepping
//!
//! This module turns a run definition into a recorded trajectory. The
//! chemistry stays behind [`ReactorSimulator`](crate::physics::ReactorSimulator);
//! this layer only decides when the reactor is sampled and keeps the record.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW LONG)
//!
//! 1. **Run** (`SimulationRun`) - WHAT to simulate
//!    - Initial temperature and pressure
//!    - Initial composition
//!    - Reactor mode (constant temperature or constant pressure)
//!
//! 2. **Horizon** (`SimulationHorizon`) - HOW LONG and how finely
//!    - Fixed duration or fixed number of samples
//!    - Sampling step
//!
//! 3. **Driver** (`advance`, `advance_with`) - the stepping loop
//!    - Advances the reactor to each output time
//!    - Validates every sample
//!    - Optionally stops early when an observer says so
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐     ┌────────────────────┐
//! │ SimulationRun   │     │ SimulationHorizon  │
//! └────────┬────────┘     └─────────┬──────────┘
//!          │                        │
//!          └──────────┬─────────────┘
//!                     │
//!            ┌────────▼─────────┐
//!            │ advance_with     │ ← asks the simulator for a reactor,
//!            │ (stepping loop)  │   samples it at t = n·dt
//!            └────────┬─────────┘
//!                     │
//!            ┌────────▼─────────┐
//!            │ Trajectory       │ ← time-ordered samples + metadata
//!            └──────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use ignite_rs::models::GlobalMethaneKinetics;
//! use ignite_rs::physics::ONE_ATMOSPHERE;
//! use ignite_rs::solver::{advance, ReactorMode, SimulationHorizon, SimulationRun};
//!
//! let run = SimulationRun::new(
//!     1250.0,
//!     ONE_ATMOSPHERE,
//!     "CH4:1, O2:2, N2:7.52".parse().unwrap(),
//!     ReactorMode::ConstantPressure,
//! ).unwrap();
//!
//! let horizon = SimulationHorizon::duration(0.002, 2e-4);
//! let trajectory = advance(&GlobalMethaneKinetics::default(), &run, &horizon).unwrap();
//!
//! assert_eq!(trajectory.len(), 11);
//! ```
//!
//! # Error Handling
//!
//! Common errors:
//! - Invalid horizon (non-positive step, zero steps) → configuration error
//! - Simulator failure (unknown species, divergence, no convergence) → simulation error
//! - Non-finite state or out-of-order sample → simulation error

// =================================================================================================
// Module Declarations
// =================================================================================================
mod runner;
mod scenario;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use runner::{advance, advance_with, StepControl};
pub use scenario::{ReactorMode, SimulationRun};
pub use traits::{Sample, SimulationHorizon, Trajectory};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::SimulationError;
use crate::physics::ThermoState;

/// Validate a reactor state for numerical issues
///
/// Checks that no quantity is NaN or infinite, which would indicate numerical
/// instability inside the simulator.
///
/// # Arguments
///
/// * `state` - State returned by the reactor
/// * `time` - Time it was sampled at (for error reporting)
pub(crate) fn validate_state(state: &ThermoState, time: f64) -> Result<(), SimulationError> {
    if let Some(quantity) = state.non_finite_quantity() {
        return Err(SimulationError::NonFinite { quantity, time });
    }

    if state.temperature <= 0.0 {
        return Err(SimulationError::InvalidState(format!(
            "temperature {} K at t = {} s is not positive",
            state.temperature, time
        )));
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    #[test]
    fn test_valid_state_passes() {
        let state = ThermoState::new(1250.0, 101_325.0, 1.0, DVector::from_vec(vec![0.5, 0.5]));
        assert!(validate_state(&state, 0.1).is_ok());
    }

    #[test]
    fn test_infinite_pressure_is_reported_with_time() {
        let state = ThermoState::new(1250.0, f64::INFINITY, 1.0, DVector::from_vec(vec![1.0]));
        assert_eq!(
            validate_state(&state, 0.25),
            Err(SimulationError::NonFinite { quantity: "pressure", time: 0.25 })
        );
    }

    #[test]
    fn test_negative_temperature_is_invalid() {
        let state = ThermoState::new(-5.0, 101_325.0, 1.0, DVector::from_vec(vec![1.0]));
        assert!(matches!(validate_state(&state, 0.0), Err(SimulationError::InvalidState(_))));
    }
}
