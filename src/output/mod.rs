//! Output module for sweep results
//!
//! This module turns a [`SweepTable`](crate::sweep::SweepTable) into
//! something a person or another program can read:
//! - **Report**: aligned text tables of ignition delays
//! - **Export**: CSV/JSON files for external analysis
//! - **Visualization**: PNG/SVG charts using plotters
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── report.rs           ← Text tables
//! ├── export/             ← Data export
//! │   ├── mod.rs          ← Exporter trait
//! │   ├── csv.rs
//! │   └── json.rs
//! └── visualization/      ← Charts
//!     ├── mod.rs
//!     ├── config.rs
//!     └── ignition.rs
//! ```
//!
//! # Design Philosophy
//!
//! Everything here only reads the result table. Non-ignition stays distinct
//! from a zero delay in every format: `no ignition` in text, an empty cell in
//! CSV, `null` in JSON, a missing point on charts.

pub mod export;
pub mod report;
pub mod visualization;

pub use report::{format_delay_table, format_study_report};
