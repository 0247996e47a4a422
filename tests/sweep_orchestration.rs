//! Integration tests: sweep orchestration with mock simulators
//!
//! The mock simulators ignite at a known time, so delays, ordering and
//! failure attribution can be checked exactly.

use approx::assert_relative_eq;

use ignite_rs::error::{SimulationError, StudyError};
use ignite_rs::ignition::DetectionRule;
use ignite_rs::solver::SimulationHorizon;
use ignite_rs::sweep::{Parameter, SweepAxis, SweepGrid, SweepOrchestrator, SweepSettings};

mod common;
use common::{methane_template, pressure_grid, Counting, FailingAt, Inert, StepHeating};

fn settings() -> SweepSettings {
    SweepSettings::new(SimulationHorizon::duration(0.02, 1e-4))
}

// =================================================================================================
// Ordering and indexing
// =================================================================================================

#[test]
fn test_three_pressures_give_three_ordered_entries() {
    let simulator = StepHeating::new(0.01);
    let grid = pressure_grid(&[1.0, 2.0, 4.0]);

    let table = SweepOrchestrator::new(&simulator, settings())
        .run(&grid, &methane_template("constant pressure"))
        .unwrap();

    assert_eq!(table.len(), 3);
    for (i, (record, pressure)) in table.records().iter().zip([1.0, 2.0, 4.0]).enumerate() {
        assert_eq!(record.point.index, vec![i]);
        assert_relative_eq!(record.run.initial_pressure_atm(), pressure, epsilon = 1e-12);
        assert_relative_eq!(record.ignition.delay.unwrap(), 0.01 / pressure, epsilon = 1e-9);
    }
}

#[test]
fn test_two_axis_grid_visits_outer_then_inner() {
    let simulator = StepHeating::new(0.01);
    let grid = SweepGrid::two_axis(
        SweepAxis::new(Parameter::Pressure, vec![1.0, 2.0]),
        SweepAxis::new(Parameter::SpeciesAmount("CH4".to_string()), vec![0.1, 0.2, 0.3]),
    );

    let table = SweepOrchestrator::new(&simulator, settings())
        .run(&grid, &methane_template("constant pressure"))
        .unwrap();

    let indices: Vec<Vec<usize>> = table.records().iter().map(|r| r.point.index.clone()).collect();
    assert_eq!(
        indices,
        vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 1], vec![1, 2]]
    );

    let record = table.get(&[1, 2]).unwrap();
    assert_relative_eq!(record.run.initial_pressure_atm(), 2.0, epsilon = 1e-12);
    assert_eq!(record.run.composition().amount("CH4"), 0.3);
    // Other species keep their template amounts
    assert_eq!(record.run.composition().amount("O2"), 2.0);

    let matrix = table.delay_matrix();
    assert_eq!(matrix.dim(), (2, 3));
    assert_relative_eq!(matrix[[1, 0]].unwrap(), 0.005, epsilon = 1e-9);
}

#[test]
fn test_reactor_mode_reaches_the_simulator() {
    let simulator = StepHeating::new(0.01);
    let grid = pressure_grid(&[1.0]);

    let rigid = SweepOrchestrator::new(&simulator, settings())
        .run(&grid, &methane_template("constant temperature"))
        .unwrap();

    assert_relative_eq!(rigid.records()[0].ignition.delay.unwrap(), 0.005, epsilon = 1e-9);
}

// =================================================================================================
// Failure policy
// =================================================================================================

#[test]
fn test_unknown_mode_is_configuration_error_before_simulating() {
    let simulator = Counting::new(StepHeating::new(0.01));
    let grid = pressure_grid(&[1.0, 2.0, 3.0]);

    let error = SweepOrchestrator::new(&simulator, settings())
        .run(&grid, &methane_template("constant entropy"))
        .unwrap_err();

    assert!(error.is_configuration());
    assert!(error.to_string().contains("constant entropy"));
    assert_eq!(simulator.calls(), 0);
}

#[test]
fn test_simulator_failure_names_grid_point() {
    for parallel in [false, true] {
        let simulator = FailingAt {
            failing_pressure_atm: 2.0,
            inner: StepHeating::new(0.01),
        };
        let grid = pressure_grid(&[1.0, 2.0, 3.0]);

        let error = SweepOrchestrator::new(&simulator, settings().parallel(parallel))
            .run(&grid, &methane_template("constant pressure"))
            .unwrap_err();

        match &error {
            StudyError::GridPoint { index, point, source } => {
                assert_eq!(index, &vec![1]);
                assert_eq!(point, "pressure = 2 atm");
                assert!(matches!(
                    source.as_ref(),
                    StudyError::Simulation(SimulationError::Engine(_))
                ));
            }
            other => panic!("expected a grid point error, got {other}"),
        }
        assert!(!error.is_configuration());
    }
}

#[test]
fn test_invalid_horizon_is_rejected() {
    let simulator = Counting::new(StepHeating::new(0.01));
    let settings = SweepSettings::new(SimulationHorizon::duration(0.02, 0.0));

    let result = SweepOrchestrator::new(&simulator, settings)
        .run(&pressure_grid(&[1.0]), &methane_template("constant pressure"));

    assert!(result.unwrap_err().is_configuration());
    assert_eq!(simulator.calls(), 0);
}

// =================================================================================================
// Non-ignition, idempotence, parallelism
// =================================================================================================

#[test]
fn test_non_ignition_is_recorded_as_none() {
    let simulator = Inert { drift: 150.0 };

    let table = SweepOrchestrator::new(&simulator, settings())
        .run(&pressure_grid(&[1.0, 5.0]), &methane_template("constant pressure"))
        .unwrap();

    assert_eq!(table.ignited_count(), 0);
    assert_eq!(table.delays(), vec![None, None]);
    // Full horizon was simulated: 200 steps plus the initial sample
    assert_eq!(table.records()[0].trajectory.len(), 201);
}

#[test]
fn test_repeated_sweeps_are_identical() {
    let simulator = StepHeating::new(0.01);
    let grid = pressure_grid(&[1.0, 1.5, 2.0, 3.0]);
    let template = methane_template("constant pressure");
    let orchestrator = SweepOrchestrator::new(&simulator, settings());

    let first = orchestrator.run(&grid, &template).unwrap();
    let second = orchestrator.run(&grid, &template).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let simulator = StepHeating::new(0.01);
    let grid = SweepGrid::two_axis(
        SweepAxis::linspace(Parameter::Pressure, 1.0, 5.0, 5),
        SweepAxis::linspace(Parameter::Temperature, 1000.0, 1400.0, 3),
    );
    let template = methane_template("constant pressure");

    let sequential = SweepOrchestrator::new(&simulator, settings().parallel(false))
        .run(&grid, &template)
        .unwrap();
    let parallel = SweepOrchestrator::new(&simulator, settings().parallel(true))
        .run(&grid, &template)
        .unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_stop_at_ignition_keeps_delays() {
    let simulator = StepHeating::new(0.01);
    let grid = pressure_grid(&[1.0, 2.0]);
    let template = methane_template("constant pressure");

    let full = SweepOrchestrator::new(&simulator, settings())
        .run(&grid, &template)
        .unwrap();
    let early = SweepOrchestrator::new(&simulator, settings().stop_at_ignition(true))
        .run(&grid, &template)
        .unwrap();

    assert_eq!(full.delays(), early.delays());
    assert!(early.records()[0].trajectory.len() < full.records()[0].trajectory.len());
}

#[test]
fn test_consecutive_delta_sweep() {
    let simulator = StepHeating::new(0.01);
    let settings = settings().detection(DetectionRule::ConsecutiveDelta);

    let table = SweepOrchestrator::new(&simulator, settings)
        .run(&pressure_grid(&[2.0]), &methane_template("constant pressure"))
        .unwrap();

    // The 1500 K jump lands on the 0.005 s sample; the pair starts one step earlier
    assert_relative_eq!(table.records()[0].ignition.delay.unwrap(), 0.0049, epsilon = 1e-9);
}
