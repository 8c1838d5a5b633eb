//! # Hash aggregation
//!
//! Hashes each partition of a track and merges the per-interval cell counts
//! into a table or a graph.
//!
//! ```text
//! track ──slice──▶ [sub-track; n] ──hash──▶ [LabeledCounts; n] ──┬─▶ timehex_table
//!                                                                ├─▶ chronnet_create
//!                                                                └─▶ geosynchnet_create
//! ```
//!
//! All merges are plain sums over cell pairs, so the result does not depend
//! on the order partitions are hashed in (see the `parallel` feature).

pub mod graph;
pub mod timehex;
pub mod chronnet;
pub mod geosynchnet;

pub use graph::{CellGraph, GraphMode};
pub use timehex::{TimeHexRow, TimeHexTable, timehex_table, convert_timehex};
pub use chronnet::{ChronnetConfig, chronnet_create, convert_chronnet};
pub use geosynchnet::{geosynchnet_create, convert_geosynchnet};

use chrono::TimeDelta;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::hasher::SpatialHasher;
use crate::model::*;
use crate::slicing::{self, SlicingConfig};
use crate::Result;

/// The cell counts of one interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledCounts {
    pub label: IntervalLabel,
    pub counts: CellCounts,
}

impl LabeledCounts {
    pub fn new(label: IntervalLabel, counts: CellCounts) -> Self {
        Self { label, counts }
    }

    /// Total number of cell occurrences (a cell with count `k` counts `k` times).
    pub fn occurrences(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Hash every partition, pairing each result with its interval label.
///
/// `parts` and `labels` are zipped; extra entries on either side are ignored.
pub fn hash_partitions<H>(parts: &[Track], labels: &[IntervalLabel], hasher: &H) -> Vec<LabeledCounts>
where
    H: SpatialHasher + ?Sized,
{
    #[cfg(feature = "parallel")]
    let hashed: Vec<LabeledCounts> = parts
        .par_iter()
        .zip(labels.par_iter())
        .map(|(part, label)| LabeledCounts::new(*label, hasher.hash_track(part)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let hashed: Vec<LabeledCounts> = parts
        .iter()
        .zip(labels)
        .map(|(part, label)| LabeledCounts::new(*label, hasher.hash_track(part)))
        .collect();

    hashed
}

/// Slice `track` into `period`-long intervals and hash each one.
///
/// An empty track is not an error: it yields no intervals and a warning.
pub fn hash_intervals<H>(
    track: &Track,
    period: TimeDelta,
    hasher: &H,
    config: &SlicingConfig,
) -> Result<Vec<LabeledCounts>>
where
    H: SpatialHasher + ?Sized,
{
    slicing::ensure_positive(period)?;
    config.validate()?;

    let (Some(start), Some(end)) = (track.start(), track.end()) else {
        warn!("empty track: no intervals to hash");
        return Ok(Vec::new());
    };

    let boundaries = config.boundaries(start, end, period)?;
    let parts = slicing::partition(track, &boundaries);
    let labels = slicing::interval_labels(start, &boundaries);
    let hashed = hash_partitions(&parts, &labels, hasher);

    debug!(
        intervals = hashed.len(),
        cells = hashed.iter().map(|h| h.counts.len()).sum::<usize>(),
        "hashed track intervals"
    );
    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::hasher::GridHasher;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2020, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_hash_intervals_labels_and_counts() {
        let track = Track::new([
            GeoShape::point(Coordinate::new(-0.104154, 51.511920), at(8, 5)),
            GeoShape::point(Coordinate::new(-0.087478, 51.508595), at(10, 5)),
            GeoShape::point(Coordinate::new(-0.087478, 51.508595), at(10, 5)),
        ]);
        let hasher = GridHasher::new(18).unwrap();
        let hashed = hash_intervals(&track, TimeDelta::hours(1), &hasher, &SlicingConfig::default()).unwrap();

        assert_eq!(hashed.len(), 2);
        assert_eq!(hashed[0].label.to_string(), "2020-01-01 08:05:00, 2020-01-01 09:05:00");
        assert_eq!(hashed[1].label.to_string(), "2020-01-01 09:05:00, 2020-01-01 10:05:01");
        assert_eq!(hashed[1].counts["121ffc032506"], 2);
        assert_eq!(hashed[1].occurrences(), 2);
    }

    #[test]
    fn test_empty_track_is_not_an_error() {
        let hasher = GridHasher::new(10).unwrap();
        let hashed = hash_intervals(&Track::empty(), TimeDelta::hours(1), &hasher, &SlicingConfig::default()).unwrap();
        assert!(hashed.is_empty());
    }

    #[test]
    fn test_empty_track_still_validates_period() {
        let hasher = GridHasher::new(10).unwrap();
        let result = hash_intervals(&Track::empty(), TimeDelta::zero(), &hasher, &SlicingConfig::default());
        assert!(matches!(result, Err(crate::Error::InvalidPeriod(_))));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_hashing_matches_sequential() {
        let track: Track = (0..240)
            .map(|i| {
                let lon = -0.2 + (i % 17) as f64 * 0.01;
                GeoShape::point(Coordinate::new(lon, 51.5), at(0, 0) + TimeDelta::minutes(i * 5))
            })
            .collect();
        let hasher = GridHasher::new(16).unwrap();
        let boundaries = slicing::generate_boundaries(track.start().unwrap(), track.end().unwrap(), TimeDelta::minutes(20)).unwrap();
        let parts = slicing::partition(&track, &boundaries);
        let labels = slicing::interval_labels(track.start().unwrap(), &boundaries);

        let sequential: Vec<LabeledCounts> = parts
            .iter()
            .zip(&labels)
            .map(|(part, label)| LabeledCounts::new(*label, hasher.hash_track(part)))
            .collect();
        assert_eq!(hash_partitions(&parts, &labels, &hasher), sequential);
    }
}
