//! # Time grid
//!
//! A fixed-width layout of a track: one row per calendar-aligned interval,
//! one column per sub-interval, each cell holding the hash of where the
//! track was during that sub-interval.
//!
//! ```text
//!                 Period_1        Period_2        …   Period_n
//! 08:00 row   │ hash(centroid)│      0        │ … │ hash(centroid)│
//! 10:00 row   │      0        │ hash(centroid)│ … │      0        │
//! ```
//!
//! Rows start on multiples of the interval (see
//! [`crate::slicing::round_down`]), so grids from different tracks line up.

use chrono::TimeDelta;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::hasher::SpatialHasher;
use crate::model::*;
use crate::slicing::{self, checked_step, ensure_positive, intervals, SlicingConfig};
use crate::{Error, Result};

/// Value of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GridCell {
    /// No shape in the sub-interval. Serializes as the sentinel `0`.
    Empty,
    /// Cell id of the sub-interval's centroid.
    Hash(CellId),
    /// The same cell id read as a base-16 integer.
    Numeric(u128),
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }

    pub fn as_hash(&self) -> Option<&str> {
        match self {
            GridCell::Hash(h) => Some(h),
            _ => None,
        }
    }
}

impl Serialize for GridCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GridCell::Empty => serializer.serialize_u8(0),
            GridCell::Hash(h) => serializer.serialize_str(h),
            GridCell::Numeric(n) => serializer.serialize_u128(*n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGridRow {
    pub interval_start: Timestamp,
    pub cells: Vec<GridCell>,
}

/// Rows of equal length; `columns` names them `Period_1` … `Period_n`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimeGrid {
    columns: Vec<String>,
    rows: Vec<TimeGridRow>,
}

impl TimeGrid {
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn rows(&self) -> &[TimeGridRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn get(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn interval_starts(&self) -> Vec<Timestamp> {
        self.rows.iter().map(|r| r.interval_start).collect()
    }
}

/// `count + 1` sub-interval edges, `width` apart, starting at
/// `segment_start`. The last edge is pulled back by one nanosecond so the
/// closed final window stays inside its row.
pub fn align_subintervals(segment_start: Timestamp, count: usize, width: TimeDelta) -> Result<Vec<Timestamp>> {
    SlicingConfig::default().subintervals(segment_start, count, width)
}

pub(crate) fn subintervals_with_epsilon(
    segment_start: Timestamp,
    count: usize,
    width: TimeDelta,
    epsilon: TimeDelta,
) -> Result<Vec<Timestamp>> {
    ensure_positive(width)?;
    if count == 0 {
        return Err(Error::InvalidConfig("a time grid row needs at least one sub-interval".into()));
    }
    if epsilon >= width {
        return Err(Error::InvalidConfig(format!(
            "sub-interval nudge {epsilon} must be shorter than the sub-interval {width}"
        )));
    }

    let mut edges = Vec::with_capacity(count + 1);
    let mut edge = segment_start;
    edges.push(edge);
    for _ in 0..count {
        edge = checked_step(edge, width)?;
        edges.push(edge);
    }
    if let Some(last) = edges.last_mut() {
        *last = last.checked_sub_signed(epsilon).ok_or(Error::TimestampOverflow(*last))?;
    }
    Ok(edges)
}

/// Number of `subinterval`-wide columns needed to cover one `interval`.
pub fn subinterval_count(interval: TimeDelta, subinterval: TimeDelta) -> Result<usize> {
    ensure_positive(interval)?;
    ensure_positive(subinterval)?;
    let (whole, sub) = (intervals::nanos_of(interval), intervals::nanos_of(subinterval));
    let count = (whole + sub - 1) / sub;
    usize::try_from(count).map_err(|_| Error::InvalidConfig(format!("{count} sub-intervals per row is too many")))
}

/// Lay `track` out on a time grid with the default boundary nudges.
///
/// With `integerize` every non-empty cell is the hash read as base-16.
pub fn convert_time_grid<H>(
    track: &Track,
    interval: TimeDelta,
    subinterval: TimeDelta,
    hasher: &H,
    integerize: bool,
) -> Result<TimeGrid>
where
    H: SpatialHasher + ?Sized,
{
    build_time_grid(track, interval, subinterval, hasher, integerize, &SlicingConfig::default())
}

pub fn build_time_grid<H>(
    track: &Track,
    interval: TimeDelta,
    subinterval: TimeDelta,
    hasher: &H,
    integerize: bool,
    config: &SlicingConfig,
) -> Result<TimeGrid>
where
    H: SpatialHasher + ?Sized,
{
    config.validate()?;
    let count = subinterval_count(interval, subinterval)?;
    let columns: Vec<String> = (1..=count).map(|i| format!("Period_{i}")).collect();

    let (Some(start), Some(end)) = (track.start(), track.end()) else {
        warn!("empty track: returning a time grid without rows");
        return Ok(TimeGrid { columns, rows: Vec::new() });
    };

    let ticks = slicing::generate_aligned_boundaries(start, end, interval)?;
    let mut rows = Vec::with_capacity(ticks.len());
    for (label, segment) in slicing::partition_aligned(track, &ticks) {
        let edges = config.subintervals(label.start, count, subinterval)?;
        let mut cells = Vec::with_capacity(count);
        for (j, window) in edges.windows(2).enumerate() {
            let hits = if j + 2 == edges.len() {
                segment.filter_by_time(window[0], window[1])
            } else {
                segment.slice(window[0], window[1])
            };
            cells.push(grid_cell(&hits, hasher, integerize)?);
        }
        rows.push(TimeGridRow { interval_start: label.start, cells });
    }

    debug!(rows = rows.len(), columns = count, "built time grid");
    Ok(TimeGrid { columns, rows })
}

fn grid_cell<H>(hits: &Track, hasher: &H, integerize: bool) -> Result<GridCell>
where
    H: SpatialHasher + ?Sized,
{
    let Some(id) = hits.centroid().and_then(|c| hasher.hash_point(c)) else {
        return Ok(GridCell::Empty);
    };
    if !integerize {
        return Ok(GridCell::Hash(id));
    }
    match u128::from_str_radix(&id, 16) {
        Ok(n) => Ok(GridCell::Numeric(n)),
        Err(_) => Err(Error::InvalidHash(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2020, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_align_nudges_last_edge_back() {
        let edges = align_subintervals(at(8, 0), 2, TimeDelta::hours(1)).unwrap();
        assert_eq!(edges, vec![at(8, 0), at(9, 0), at(10, 0) - TimeDelta::nanoseconds(1)]);
    }

    #[test]
    fn test_align_rejects_bad_input() {
        assert!(align_subintervals(at(8, 0), 0, TimeDelta::hours(1)).is_err());
        assert!(align_subintervals(at(8, 0), 2, TimeDelta::zero()).is_err());
        let config = SlicingConfig { subinterval_epsilon: TimeDelta::hours(1), ..Default::default() };
        assert!(config.subintervals(at(8, 0), 2, TimeDelta::hours(1)).is_err());
    }

    #[test]
    fn test_subinterval_count_rounds_up() {
        assert_eq!(subinterval_count(TimeDelta::hours(2), TimeDelta::hours(1)).unwrap(), 2);
        assert_eq!(subinterval_count(TimeDelta::hours(2), TimeDelta::minutes(45)).unwrap(), 3);
        assert!(subinterval_count(TimeDelta::hours(2), TimeDelta::zero()).is_err());
    }

    #[test]
    fn test_empty_cell_serializes_as_zero() {
        let row = TimeGridRow { interval_start: at(8, 0), cells: vec![GridCell::Empty, GridCell::Hash("ab".into()), GridCell::Numeric(171)] };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["cells"], serde_json::json!([0, "ab", 171]));
    }

    #[test]
    fn test_non_hex_hash_fails_integerize() {
        let hasher = |t: &Track| -> CellCounts {
            t.iter().map(|_| ("not-hex".to_string(), 1)).collect()
        };
        let track = Track::new([GeoShape::point(Coordinate::new(0.0, 0.0), at(8, 5))]);
        let result = convert_time_grid(&track, TimeDelta::hours(1), TimeDelta::minutes(30), &hasher, true);
        assert!(matches!(result, Err(Error::InvalidHash(id)) if id == "not-hex"));
    }
}
