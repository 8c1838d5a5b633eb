//! Timehex — one row of cell counts per interval.

use std::collections::BTreeSet;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::{hash_intervals, LabeledCounts};
use crate::hasher::SpatialHasher;
use crate::model::*;
use crate::slicing::SlicingConfig;
use crate::Result;

/// A table row: the interval plus the counts of the cells seen in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeHexRow {
    pub label: IntervalLabel,
    pub counts: CellCounts,
}

impl TimeHexRow {
    /// `"start, end"` in `%Y-%m-%d %H:%M:%S`.
    pub fn interval(&self) -> String {
        self.label.to_string()
    }

    pub fn start_time(&self) -> Timestamp { self.label.start }
    pub fn end_time(&self) -> Timestamp { self.label.end }

    /// Count for `cell`; cells not seen in this interval read as zero.
    pub fn get(&self, cell: &str) -> u64 {
        self.counts.get(cell).copied().unwrap_or(0)
    }
}

/// Sparse interval × cell table. Columns are every cell observed in any
/// interval, sorted; rows keep interval order, empty intervals included.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeHexTable {
    columns: Vec<CellId>,
    rows: Vec<TimeHexRow>,
}

impl TimeHexTable {
    pub fn columns(&self) -> &[CellId] { &self.columns }
    pub fn rows(&self) -> &[TimeHexRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Count at (`row`, `cell`). `None` only when the row doesn't exist.
    pub fn get(&self, row: usize, cell: &str) -> Option<u64> {
        self.rows.get(row).map(|r| r.get(cell))
    }

    /// One value per row for `cell`, zeros where it wasn't seen.
    pub fn column(&self, cell: &str) -> Vec<u64> {
        self.rows.iter().map(|r| r.get(cell)).collect()
    }
}

/// Assemble the table from hashed intervals.
pub fn timehex_table(hashed: Vec<LabeledCounts>) -> TimeHexTable {
    let columns: BTreeSet<CellId> = hashed
        .iter()
        .flat_map(|h| h.counts.keys().cloned())
        .collect();
    let rows = hashed
        .into_iter()
        .map(|LabeledCounts { label, counts }| TimeHexRow { label, counts })
        .collect();
    TimeHexTable { columns: columns.into_iter().collect(), rows }
}

/// Slice `track` into `period`-long intervals and tabulate cell counts.
pub fn convert_timehex<H>(track: &Track, period: TimeDelta, hasher: &H) -> Result<TimeHexTable>
where
    H: SpatialHasher + ?Sized,
{
    let hashed = hash_intervals(track, period, hasher, &SlicingConfig::default())?;
    Ok(timehex_table(hashed))
}
