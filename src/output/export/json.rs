//! JSON export of sweep results
//!
//! The delay table is written as
//!
//! ```json
//! {
//!   "axes": [{ "parameter": "pressure", "unit": "atm", "values": [1.0, 1.5] }],
//!   "points": [
//!     { "index": [0], "values": [1.0], "delay": 0.0326, "ignited": true },
//!     { "index": [1], "values": [1.5], "delay": null, "ignited": false }
//!   ]
//! }
//! ```
//!
//! `delay` is `null` for runs that never ignite.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{StudyError, StudyResult};
use crate::output::export::{downsample_indices, Exporter};
use crate::physics::ThermoState;
use crate::sweep::{SweepRecord, SweepTable};

#[derive(Serialize)]
struct AxisDocument<'a> {
    parameter: String,
    unit: &'a str,
    values: &'a [f64],
}

#[derive(Serialize)]
struct PointDocument<'a> {
    index: &'a [usize],
    values: Vec<f64>,
    delay: Option<f64>,
    ignited: bool,
}

#[derive(Serialize)]
struct TableDocument<'a> {
    axes: Vec<AxisDocument<'a>>,
    points: Vec<PointDocument<'a>>,
}

#[derive(Serialize)]
struct SampleDocument<'a> {
    time: f64,
    #[serde(flatten)]
    state: &'a ThermoState,
}

#[derive(Serialize)]
struct TrajectoryDocument<'a> {
    point: String,
    reactor_mode: &'a str,
    delay: Option<f64>,
    species: &'a [String],
    samples: Vec<SampleDocument<'a>>,
}

/// JSON implementation of [`Exporter`]
#[derive(Debug, Clone)]
pub struct JsonExporter {
    /// Indented output (default: true)
    pub pretty: bool,

    /// Downsample trajectories to at most this many samples
    pub max_points: Option<usize>,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self {
            pretty: true,
            max_points: None,
        }
    }
}

impl JsonExporter {
    fn write<T: Serialize>(&self, document: &T, path: &Path) -> StudyResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, document)?;
        } else {
            serde_json::to_writer(&mut out, document)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl Exporter for JsonExporter {
    type Error = StudyError;

    fn export_table(&self, table: &SweepTable, path: &Path) -> StudyResult<()> {
        let axes = table
            .grid()
            .axes()
            .into_iter()
            .map(|axis| AxisDocument {
                parameter: axis.parameter.to_string(),
                unit: axis.parameter.unit(),
                values: &axis.values,
            })
            .collect();

        let points = table
            .records()
            .iter()
            .map(|record| PointDocument {
                index: &record.point.index,
                values: record.point.values.iter().map(|(_, v)| *v).collect(),
                delay: record.ignition.delay,
                ignited: record.ignition.ignited(),
            })
            .collect();

        self.write(&TableDocument { axes, points }, path)
    }

    fn export_trajectory(&self, record: &SweepRecord, path: &Path) -> StudyResult<()> {
        let samples = record.trajectory.samples();
        let document = TrajectoryDocument {
            point: record.point.to_string(),
            reactor_mode: record.run.reactor_mode().name(),
            delay: record.ignition.delay,
            species: record.trajectory.species(),
            samples: downsample_indices(samples.len(), self.max_points)
                .map(|i| SampleDocument {
                    time: samples[i].time,
                    state: &samples[i].state,
                })
                .collect(),
        };

        self.write(&document, path)
    }
}
