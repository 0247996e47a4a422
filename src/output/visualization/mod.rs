//! Charts of sweep results, drawn with `plotters`
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **ignition**: Temperature traces and delay curves
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ignite_rs::output::visualization::{plot_delay_curve, plot_temperature_traces, PlotConfig};
//!
//! let table = study.run(&simulator, true)?;
//!
//! plot_temperature_traces(&table, "pressure_temperature.png", None)?;
//!
//! let config = PlotConfig::delay_curve("Ignition delay vs pressure");
//! plot_delay_curve(&table, "pressure_delays.svg", Some(&config))?;
//! ```
//!
//! # Which Function
//!
//! | Use Case | Function |
//! |----------|----------|
//! | Temperature vs time of every grid point | `plot_temperature_traces` |
//! | Delay vs parameter, one-axis sweep | `plot_delay_curve` |
//! | Delay vs inner parameter per outer value | `plot_delay_family` |

pub mod config;
pub mod ignition;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};

pub use ignition::{plot_delay_curve, plot_delay_family, plot_temperature_traces};
