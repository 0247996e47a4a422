//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_simulators;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_simulators::{Counting, FailingAt, Inert, StepHeating};
pub use test_helpers::{
    methane_template,
    pressure_grid,
    relative_error,
    stoichiometric_methane,
    synthetic_trajectory,
};
