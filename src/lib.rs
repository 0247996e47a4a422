//! ignite-rs: Auto-ignition Delay Studies
//!
//! A framework for measuring how long a fuel/oxidiser mixture takes to
//! auto-ignite, and how that delay depends on pressure, temperature and
//! composition.
//!
//! # Architecture
//!
//! ignite-rs is built on two core principles:
//!
//! 1. **Separation of Chemistry and Analysis**
//!    - Reactor simulators integrate the kinetics (what happens in the vessel)
//!    - Detection and sweeps judge trajectories (what we measure)
//!
//! 2. **Explicit Configuration**
//!    - Horizons, step sizes and detection rules are part of every study
//!    - Reactor modes are checked before the first simulation starts
//!    - Non-ignition is a distinct outcome, never a zero delay
//!
//! # Quick Start
//!
//! ```rust
//! use ignite_rs::prelude::*;
//!
//! # fn main() -> Result<(), StudyError> {
//! // 1. Describe the runs: a template and the axis to sweep
//! let template = RunTemplate::new(
//!     1300.0,                            // initial temperature (K)
//!     1.0,                               // initial pressure (atm)
//!     "CH4:1, O2:2, N2:7.52".parse()?,
//!     "constant pressure",
//! );
//! let grid = SweepGrid::one_axis(SweepAxis::new(Parameter::Pressure, vec![1.0, 3.0]));
//!
//! // 2. Choose the horizon and the detection rule
//! let settings = SweepSettings::new(SimulationHorizon::duration(0.5, 1e-3))
//!     .detection(DetectionRule::CumulativeRise)
//!     .stop_at_ignition(true);
//!
//! // 3. Run the sweep with the built-in methane model
//! let simulator = GlobalMethaneKinetics::default();
//! let table = SweepOrchestrator::new(&simulator, settings).run(&grid, &template)?;
//!
//! // 4. Read the delays (None = no ignition within the horizon)
//! for record in table.records() {
//!     println!("{}: {}", record.point, record.ignition);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Thermodynamic state and the reactor simulator seam
//! - [`models`]: Built-in reactor simulators
//! - [`solver`]: Runs, horizons, trajectories and the stepping driver
//! - [`ignition`]: Ignition detection
//! - [`sweep`]: Parameter grids and the sweep orchestrator
//! - [`config`]: TOML study documents
//! - [`output`]: Reports, exports and charts

pub mod error;

// Core modules
pub mod physics;

pub mod models;
pub mod solver;

pub mod ignition;
pub mod sweep;

pub mod config;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use ignite_rs::prelude::*;
    //! ```
    pub use crate::config::{Study, StudyConfig};
    pub use crate::error::{SimulationError, StudyError, StudyResult};
    pub use crate::ignition::{DetectionRule, IgnitionDetector, IgnitionResult};
    pub use crate::models::GlobalMethaneKinetics;
    pub use crate::physics::{Composition, Reactor, ReactorSimulator, ThermoState};
    pub use crate::solver::{ReactorMode, SimulationHorizon, SimulationRun, Trajectory};
    pub use crate::sweep::{
        Parameter, RunTemplate, SweepAxis, SweepGrid, SweepOrchestrator, SweepSettings, SweepTable,
    };
}
