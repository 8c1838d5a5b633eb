//! Power-of-two lon/lat grid hasher.
//!
//! This is the reference implementation of `SpatialHasher`: deterministic,
//! dependency-free, good enough for tests and for embedding when no real
//! cell index is available.
//!
//! At resolution `r` the globe is cut into `2^r` columns of longitude and
//! `2^r` rows of latitude. A cell id is `{r:02x}{x}{y}` with `x` and `y` in
//! zero-padded lower-case hex, so every id parses as a base-16 integer and
//! ids of one resolution sort west to east.

use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::{Error, Result};
use super::SpatialHasher;

/// Finest supported resolution (cells of roughly 4 cm at the equator).
pub const MAX_RESOLUTION: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridHasher {
    resolution: u8,
}

impl GridHasher {
    pub fn new(resolution: u8) -> Result<Self> {
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return Err(Error::InvalidConfig(format!(
                "grid resolution {resolution} outside 1..={MAX_RESOLUTION}"
            )));
        }
        Ok(Self { resolution })
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// The cell containing `point`. Coordinates outside the valid range are
    /// clamped onto the edge cells.
    pub fn cell_of(&self, point: Coordinate) -> CellId {
        let cells = 1u64 << self.resolution;
        let x = bucket((point.lon + 180.0) / 360.0, cells);
        let y = bucket((point.lat + 90.0) / 180.0, cells);
        let width = (self.resolution as usize).div_ceil(4);
        format!("{:02x}{:0width$x}{:0width$x}", self.resolution, x, y)
    }
}

fn bucket(fraction: f64, cells: u64) -> u64 {
    let index = (fraction * cells as f64).floor();
    if index.is_nan() || index < 0.0 {
        0
    } else {
        (index as u64).min(cells - 1)
    }
}

impl SpatialHasher for GridHasher {
    fn hash_track(&self, track: &Track) -> CellCounts {
        let mut counts = CellCounts::new();
        for centroid in track.iter().filter_map(GeoShape::centroid) {
            *counts.entry(self.cell_of(centroid)).or_insert(0) += 1;
        }
        counts
    }

    fn hash_point(&self, point: Coordinate) -> Option<CellId> {
        Some(self.cell_of(point))
    }
}
