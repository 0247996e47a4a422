//! Helper functions for integration tests

use nalgebra::DVector;

use ignite_rs::physics::{Composition, ThermoState};
use ignite_rs::solver::{Sample, Trajectory};
use ignite_rs::sweep::{Parameter, RunTemplate, SweepAxis, SweepGrid};

/// Stoichiometric methane in air
pub fn stoichiometric_methane() -> Composition {
    Composition::from_pairs([("CH4", 1.0), ("O2", 2.0), ("N2", 7.52)]).unwrap()
}

/// Template at 1250 K, 1 atm, stoichiometric methane/air
pub fn methane_template(reactor: &str) -> RunTemplate {
    RunTemplate::new(1250.0, 1.0, stoichiometric_methane(), reactor)
}

/// One-axis grid over the given pressures \[atm\]
pub fn pressure_grid(pressures: &[f64]) -> SweepGrid {
    SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, pressures.to_vec()))
}

/// Trajectory from `(time, temperature)` pairs, other quantities constant
pub fn synthetic_trajectory(points: &[(f64, f64)]) -> Trajectory {
    let mut trajectory = Trajectory::new(vec!["N2".to_string()]);
    for &(time, temperature) in points {
        trajectory
            .push(Sample::new(
                time,
                ThermoState::new(temperature, 101_325.0, 1.0, DVector::from_element(1, 1.0)),
            ))
            .unwrap();
    }
    trajectory
}

/// Relative error |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-15 {
        actual.abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
