//! Physical side of a simulation
//!
//! This module provides the traits a reactor simulator implements and the
//! types describing a gas mixture and its thermodynamic state.
//!
//! # Core Concepts
//!
//! - **Reactor Simulator**: builds reactors from a run definition (the chemistry engine)
//! - **Reactor**: advances one chemical state in time
//! - **Thermo State**: temperature, pressure, volume and mole fractions at one instant
//! - **Composition**: initial species amounts
//!
//! # Architecture
//!
//! Simulators are **separate from the stepping loop and the analysis**:
//! - The simulator provides the **chemistry** (rates, equation of state)
//! - The solver module decides **when** to sample the reactor
//! - The ignition and sweep modules decide **what** the samples mean
//!
//! # Implementing a New Simulator
//!
//! ```rust
//! use ignite_rs::error::SimulationError;
//! use ignite_rs::physics::{Reactor, ReactorSimulator, ThermoState};
//! use ignite_rs::solver::SimulationRun;
//! use nalgebra::DVector;
//!
//! struct Inert { state: ThermoState }
//!
//! impl Reactor for Inert {
//!     fn species_names(&self) -> Vec<String> { vec!["N2".to_string()] }
//!     fn state(&self) -> ThermoState { self.state.clone() }
//!     fn advance(&mut self, _time: f64) -> Result<ThermoState, SimulationError> {
//!         Ok(self.state.clone())
//!     }
//! }
//!
//! struct InertSimulator;
//!
//! impl ReactorSimulator for InertSimulator {
//!     fn reactor(&self, run: &SimulationRun) -> Result<Box<dyn Reactor>, SimulationError> {
//!         let state = ThermoState::new(
//!             run.initial_temperature(),
//!             run.initial_pressure(),
//!             1.0,
//!             DVector::from_element(1, 1.0),
//!         );
//!         Ok(Box::new(Inert { state }))
//!     }
//!     fn name(&self) -> &str { "Inert" }
//! }
//! ```
//!
//! # Available Simulators
//!
//! - **Global methane kinetics**: see [`crate::models::GlobalMethaneKinetics`]

pub mod mixture;
pub mod traits;

pub use mixture::{Composition, GAS_CONSTANT, ONE_ATMOSPHERE};
pub use traits::{Reactor, ReactorSimulator, ThermoState};
