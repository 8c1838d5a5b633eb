//! # Spatial Hasher Trait
//!
//! The contract between the conversions and any spatial cell scheme.
//! A hasher maps a (sub-)track to cell-id → count; everything else in the
//! crate is built on top of that single call.
//!
//! ## Implementations
//!
//! | Hasher | Module | Description |
//! |--------|--------|-------------|
//! | `GridHasher` | `grid` | Power-of-two lon/lat grid, reference implementation |
//! | any `Fn(&Track) -> CellCounts` | — | Closures wrapping H3, geohash, … |

pub mod grid;

use chrono::{DateTime, Utc};

use crate::model::*;

pub use grid::{GridHasher, MAX_RESOLUTION};

/// Maps tracks onto spatial cells.
///
/// Implementations must be pure: the same track must always hash to the
/// same counts. `Send + Sync` so partitions can be hashed in parallel.
pub trait SpatialHasher: Send + Sync {
    /// Count the shapes of `track` per cell.
    fn hash_track(&self, track: &Track) -> CellCounts;

    /// The cell a single point falls in.
    ///
    /// Default: hash a one-point track and take its first cell.
    fn hash_point(&self, point: Coordinate) -> Option<CellId> {
        let probe = GeoShape::new(Geometry::Point(point), TimeSpan::instant(DateTime::<Utc>::UNIX_EPOCH));
        self.hash_track(&Track::singleton(probe)).into_keys().next()
    }
}

impl<F> SpatialHasher for F
where
    F: Fn(&Track) -> CellCounts + Send + Sync,
{
    fn hash_track(&self, track: &Track) -> CellCounts {
        self(track)
    }
}
