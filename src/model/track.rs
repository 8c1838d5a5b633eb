//! Track — an ordered sequence of time-stamped shapes.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::{Coordinate, GeoShape, Timestamp};
use super::coordinate::mean_of;

/// Shapes ordered by span start. Immutable once built: slicing and filtering
/// return new tracks and never touch the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GeoShape>", into = "Vec<GeoShape>")]
pub struct Track {
    shapes: Vec<GeoShape>,
}

impl Track {
    /// Build a track, sorting shapes by span start. Shapes that start at the
    /// same instant keep their input order.
    pub fn new(shapes: impl IntoIterator<Item = GeoShape>) -> Self {
        let mut shapes: Vec<GeoShape> = shapes.into_iter().collect();
        shapes.sort_by_key(GeoShape::start);
        Self { shapes }
    }

    pub fn empty() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[GeoShape] {
        &self.shapes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoShape> {
        self.shapes.iter()
    }

    /// Earliest span start.
    pub fn start(&self) -> Option<Timestamp> {
        self.shapes.first().map(GeoShape::start)
    }

    /// Latest span end. Not necessarily the end of the last shape when spans
    /// overlap.
    pub fn end(&self) -> Option<Timestamp> {
        self.shapes.iter().map(GeoShape::end).max()
    }

    /// Shapes whose span starts in `[begin, end)`.
    pub fn slice(&self, begin: Timestamp, end: Timestamp) -> Track {
        if end <= begin {
            return Track::empty();
        }
        let lo = self.shapes.partition_point(|s| s.start() < begin);
        let hi = self.shapes.partition_point(|s| s.start() < end);
        Track { shapes: self.shapes[lo..hi].to_vec() }
    }

    /// Shapes whose span starts in the closed window `[begin, end]`.
    pub fn filter_by_time(&self, begin: Timestamp, end: Timestamp) -> Track {
        if end < begin {
            return Track::empty();
        }
        let lo = self.shapes.partition_point(|s| s.start() < begin);
        let hi = self.shapes.partition_point(|s| s.start() <= end);
        Track { shapes: self.shapes[lo..hi].to_vec() }
    }

    /// Mean of the shape centroids.
    pub fn centroid(&self) -> Option<Coordinate> {
        mean_of(self.shapes.iter().filter_map(GeoShape::centroid))
    }

    /// A single-shape track, as handed to hashers one shape at a time.
    pub fn singleton(shape: GeoShape) -> Track {
        Track { shapes: vec![shape] }
    }
}

impl From<Vec<GeoShape>> for Track {
    fn from(shapes: Vec<GeoShape>) -> Self {
        Track::new(shapes)
    }
}

impl From<Track> for Vec<GeoShape> {
    fn from(track: Track) -> Self {
        track.shapes
    }
}

impl FromIterator<GeoShape> for Track {
    fn from_iter<I: IntoIterator<Item = GeoShape>>(iter: I) -> Self {
        Track::new(iter)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a GeoShape;
    type IntoIter = std::slice::Iter<'a, GeoShape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

impl Index<usize> for Track {
    type Output = GeoShape;

    fn index(&self, index: usize) -> &GeoShape {
        &self.shapes[index]
    }
}
