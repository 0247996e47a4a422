//! Plain-text delay tables
//!
//! One-axis sweeps print one row per axis value:
//!
//! ```text
//! pressure (atm)    ignition delay
//! 1                      32.600 ms
//! 1.5                    26.650 ms
//! ```
//!
//! Two-axis sweeps print one row per inner value and one column per outer
//! value, every column included. Runs that never ignite print `no ignition`.

use std::fmt::Write;

use crate::ignition::IgnitionResult;
use crate::sweep::{SweepAxis, SweepTable};

const CELL_WIDTH: usize = 14;

fn axis_header(axis: &SweepAxis) -> String {
    format!("{} ({})", axis.parameter, axis.parameter.unit())
}

fn format_delay(delay: Option<f64>) -> String {
    IgnitionResult {
        delay,
        sample_index: None,
    }
    .to_string()
}

/// Render the delays of a sweep as an aligned text table
pub fn format_delay_table(table: &SweepTable) -> String {
    let grid = table.grid();
    let matrix = table.delay_matrix();
    let mut out = String::new();

    // writeln! into a String cannot fail
    match &grid.inner {
        None => {
            let header = axis_header(&grid.outer);
            let width = header.len().max(CELL_WIDTH);
            let _ = writeln!(out, "{:<width$}  {:>CELL_WIDTH$}", header, "ignition delay");
            for (i, value) in grid.outer.values.iter().enumerate() {
                let _ = writeln!(out, "{:<width$}  {:>CELL_WIDTH$}", value, format_delay(matrix[[i, 0]]));
            }
        }
        Some(inner) => {
            let corner = format!("{} \\ {}", axis_header(inner), axis_header(&grid.outer));
            let width = corner.len().max(CELL_WIDTH);

            let _ = write!(out, "{:<width$}", corner);
            for value in &grid.outer.values {
                let _ = write!(out, "  {:>CELL_WIDTH$}", value);
            }
            out.push('\n');

            for (j, value) in inner.values.iter().enumerate() {
                let _ = write!(out, "{:<width$}", value);
                for i in 0..grid.outer.len() {
                    let _ = write!(out, "  {:>CELL_WIDTH$}", format_delay(matrix[[i, j]]));
                }
                out.push('\n');
            }
        }
    }

    out
}

/// Header line plus the table, as printed by the CLI
pub fn format_study_report(title: &str, table: &SweepTable) -> String {
    format!(
        "{}\n{}\n{}({} of {} runs ignited)\n",
        title,
        "=".repeat(title.chars().count()),
        format_delay_table(table),
        table.ignited_count(),
        table.len()
    )
}
