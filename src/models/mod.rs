//! Built-in reactor simulators
//!
//! All simulators implement the [`ReactorSimulator`](crate::physics::ReactorSimulator)
//! trait. The stepping driver only asks them for the state at each output
//! time; how they integrate between output times is their own business.
//!
//! # Available Models
//!
//! ## [`GlobalMethaneKinetics`]: single-step methane oxidation
//!
//! Adiabatic homogeneous reactor with one global reaction
//! CH4 + 2 O2 → CO2 + 2 H2O, an Arrhenius rate law and constant heat
//! capacities. Good enough to reproduce the shape of auto-ignition delay
//! curves (strong temperature dependence, weaker pressure dependence), not
//! their absolute values.
//!
//! Accepted species: CH4, O2, N2, CO2, H2O.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod global_methane;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use global_methane::{GlobalMethaneKinetics, GlobalMethaneReactor, RateParameters, Species};
