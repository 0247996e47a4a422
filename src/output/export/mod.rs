//! Export module for sweep results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file.
//!
//! # Available formats
//!
//! | Format | Module     |
//! |--------|------------|
//! | CSV    | [`csv`]    |
//! | JSON   | [`json`]   |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use ignite_rs::output::export::{CsvExporter, Exporter, JsonExporter};
//!
//! CsvExporter::default().export_table(&table, "pressure_delays.csv".as_ref())?;
//! JsonExporter::default().export_table(&table, "pressure_delays.json".as_ref())?;
//!
//! for record in table.records() {
//!     CsvExporter::default().export_trajectory(record, "point.csv".as_ref())?;
//! }
//! ```

pub mod csv;
pub mod json;

pub use csv::{CsvConfig, CsvExporter, CsvMetadata};
pub use json::JsonExporter;

use std::path::Path;

use crate::sweep::{SweepRecord, SweepTable};

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so the caller
/// can react to the precise failure without boxing.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports the delay table of a sweep, one entry per grid point.
    ///
    /// Non-ignition is written as an empty value, never as zero.
    fn export_table(&self, table: &SweepTable, path: &Path) -> Result<(), Self::Error>;

    /// Exports the trajectory of one grid point.
    fn export_trajectory(&self, record: &SweepRecord, path: &Path) -> Result<(), Self::Error>;
}

/// Indices of at most `max_points` samples out of `len`, evenly spread
///
/// The first and last samples are always kept. `None` keeps everything.
pub(crate) fn downsample_indices(len: usize, max_points: Option<usize>) -> impl Iterator<Item = usize> {
    let count = match max_points {
        Some(max) if max < len => max.max(2).min(len),
        _ => len,
    };

    (0..count).map(move |i| if count == len { i } else { i * (len - 1) / (count - 1) })
}
