//! Sweep results indexed by grid coordinates

use ndarray::Array2;

use crate::ignition::IgnitionResult;
use crate::solver::{SimulationRun, Trajectory};
use crate::sweep::{GridPoint, SweepGrid};

/// Everything recorded for one grid point
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRecord {
    pub point: GridPoint,
    pub run: SimulationRun,
    pub trajectory: Trajectory,
    pub ignition: IgnitionResult,
}

/// Result table of a sweep
///
/// Records are stored in grid visiting order (outer axis, then inner axis),
/// whatever order the runs were executed in.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTable {
    grid: SweepGrid,
    records: Vec<SweepRecord>,
}

impl SweepTable {
    pub(crate) fn new(grid: SweepGrid, records: Vec<SweepRecord>) -> Self {
        Self { grid, records }
    }

    pub fn grid(&self) -> &SweepGrid {
        &self.grid
    }

    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at grid coordinates (`[i]` or `[i, j]`)
    pub fn get(&self, index: &[usize]) -> Option<&SweepRecord> {
        let (outer, inner) = self.grid.shape();
        let position = match index {
            [i] if self.grid.inner.is_none() => *i,
            [i, j] if self.grid.inner.is_some() && *i < outer && *j < inner => i * inner + j,
            _ => return None,
        };
        self.records.get(position)
    }

    /// Ignition delays \[s\] in visiting order
    pub fn delays(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.ignition.delay).collect()
    }

    /// Delays as an (outer × inner) matrix; a one-axis sweep has one column
    pub fn delay_matrix(&self) -> Array2<Option<f64>> {
        let (outer, inner) = self.grid.shape();
        let mut matrix = Array2::from_elem((outer, inner), None);
        for record in &self.records {
            let (i, j) = match record.point.index.as_slice() {
                [i] => (*i, 0),
                [i, j] => (*i, *j),
                _ => continue,
            };
            if i < outer && j < inner {
                matrix[[i, j]] = record.ignition.delay;
            }
        }
        matrix
    }

    /// Number of grid points that ignited
    pub fn ignited_count(&self) -> usize {
        self.records.iter().filter(|r| r.ignition.ignited()).count()
    }
}
