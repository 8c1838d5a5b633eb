//! Track partitioning against a boundary list.

use tracing::{debug, warn};

use crate::model::{GeoShape, IntervalLabel, Timestamp, Track};

/// Slice `track` into one sub-track per boundary.
///
/// A cursor starts at `track.start()`; each boundary yields the shapes
/// starting in `[cursor, boundary)` (possibly none) and becomes the next
/// cursor. The result has exactly `boundaries.len()` entries and, when the
/// last boundary lies past `track.end()`, every shape lands in exactly one of
/// them.
pub fn partition(track: &Track, boundaries: &[Timestamp]) -> Vec<Track> {
    let Some(mut cursor) = track.start() else {
        return boundaries.iter().map(|_| Track::empty()).collect();
    };

    let mut parts = Vec::with_capacity(boundaries.len());
    for &boundary in boundaries {
        parts.push(track.slice(cursor, boundary));
        cursor = boundary;
    }

    debug!(
        partitions = parts.len(),
        shapes = track.len(),
        empty = parts.iter().filter(|p| p.is_empty()).count(),
        "partitioned track"
    );
    parts
}

/// The `(previous, current)` label of each partition produced by
/// [`partition`]; the first interval opens at the track start.
pub fn interval_labels(track_start: Timestamp, boundaries: &[Timestamp]) -> Vec<IntervalLabel> {
    let mut previous = track_start;
    boundaries
        .iter()
        .map(|&boundary| {
            let label = IntervalLabel::new(previous, boundary);
            previous = boundary;
            label
        })
        .collect()
}

/// Partition against calendar-aligned ticks (see
/// [`super::generate_aligned_boundaries`]).
///
/// Ticks at or before the track start would only produce empty partitions
/// in front of the data; they are dropped and only open the first row. Each
/// returned partition is labeled with the tick pair that bounds it.
pub fn partition_aligned(track: &Track, ticks: &[Timestamp]) -> Vec<(IntervalLabel, Track)> {
    let Some(start) = track.start() else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(ticks.len());
    let mut row_start = start;
    for &tick in ticks {
        if tick <= start {
            row_start = tick;
            continue;
        }
        rows.push((IntervalLabel::new(row_start, tick), track.slice(row_start, tick)));
        row_start = tick;
    }

    let last_shape_start = track.shapes().last().map(GeoShape::start);
    if let (Some(&last_tick), Some(last_shape_start)) = (ticks.last(), last_shape_start) {
        if last_tick <= last_shape_start {
            warn!(%last_tick, %last_shape_start, "aligned ticks stop before the last shape; trailing shapes are not partitioned");
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use crate::model::Coordinate;
    use crate::slicing::{generate_aligned_boundaries, generate_boundaries};

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2020, 1, 1, h, m, s).unwrap()
    }

    fn track_of(times: &[(u32, u32)]) -> Track {
        Track::new(times.iter().enumerate().map(|(i, &(h, m))| {
            GeoShape::point(Coordinate::new(i as f64, 0.0), at(h, m, 0))
        }))
    }

    #[test]
    fn test_hourly_partition() {
        let track = track_of(&[(8, 5), (9, 23), (9, 44), (10, 5)]);
        let boundaries = vec![at(9, 5, 0), at(10, 5, 1)];
        let parts = partition(&track, &boundaries);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 1);
        assert_eq!(parts[1].len(), 3);
        assert_eq!(parts[1].end(), Some(at(10, 5, 0)));
    }

    #[test]
    fn test_gap_yields_empty_partition() {
        let track = track_of(&[(8, 0), (11, 30)]);
        let boundaries = generate_boundaries(at(8, 0, 0), at(11, 30, 0), TimeDelta::hours(1)).unwrap();
        let parts = partition(&track, &boundaries);
        let sizes: Vec<usize> = parts.iter().map(Track::len).collect();
        assert_eq!(sizes, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_empty_track_partitions() {
        let parts = partition(&Track::empty(), &[at(9, 0, 0), at(10, 0, 0)]);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(Track::is_empty));
    }

    #[test]
    fn test_labels_chain() {
        let labels = interval_labels(at(8, 5, 0), &[at(9, 5, 0), at(10, 5, 1)]);
        assert_eq!(labels[0], IntervalLabel::new(at(8, 5, 0), at(9, 5, 0)));
        assert_eq!(labels[1], IntervalLabel::new(at(9, 5, 0), at(10, 5, 1)));
    }

    #[test]
    fn test_aligned_drops_leading_partition() {
        let track = track_of(&[(8, 5), (9, 23), (9, 44), (10, 11)]);
        let ticks = generate_aligned_boundaries(at(8, 5, 0), at(10, 11, 0), TimeDelta::hours(2)).unwrap();
        let rows = partition_aligned(&track, &ticks);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, IntervalLabel::new(at(8, 0, 0), at(10, 0, 0)));
        assert_eq!(rows[0].1.len(), 3);
        assert_eq!(rows[1].0, IntervalLabel::new(at(10, 0, 0), at(12, 0, 0)));
        assert_eq!(rows[1].1.len(), 1);
    }

    #[test]
    fn test_aligned_start_on_tick() {
        let track = track_of(&[(8, 0), (8, 30)]);
        let ticks = generate_aligned_boundaries(at(8, 0, 0), at(8, 30, 0), TimeDelta::hours(1)).unwrap();
        let rows = partition_aligned(&track, &ticks);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.len(), 2);
    }
}
