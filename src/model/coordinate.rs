//! Coordinates and shape geometry.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

/// The spatial part of a shape.
///
/// Only the representative point is needed by the conversions; containment
/// and intersection belong to whichever hasher is plugged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Geometry {
    Point(Coordinate),
    Circle { center: Coordinate, radius_m: f64 },
    LineString(Vec<Coordinate>),
    Polygon(Vec<Coordinate>),
}

impl Geometry {
    /// Representative point: the centre for points and circles, the vertex
    /// mean for lines and polygons. `None` for a vertex list that is empty.
    pub fn centroid(&self) -> Option<Coordinate> {
        match self {
            Geometry::Point(c) => Some(*c),
            Geometry::Circle { center, .. } => Some(*center),
            Geometry::LineString(vertices) => mean_of(vertices.iter().copied()),
            Geometry::Polygon(ring) => {
                // A closed ring repeats its first vertex; don't count it twice.
                let open = match (ring.first(), ring.last()) {
                    (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
                    _ => &ring[..],
                };
                mean_of(open.iter().copied())
            }
        }
    }
}

/// Arithmetic mean of a set of coordinates.
pub(crate) fn mean_of(points: impl IntoIterator<Item = Coordinate>) -> Option<Coordinate> {
    let (mut lon, mut lat, mut n) = (0.0, 0.0, 0usize);
    for p in points {
        lon += p.lon;
        lat += p.lat;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(Coordinate::new(lon / n as f64, lat / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_and_circle_centroid() {
        let c = Coordinate::new(-0.1, 51.5);
        assert_eq!(Geometry::Point(c).centroid(), Some(c));
        assert_eq!(Geometry::Circle { center: c, radius_m: 5000.0 }.centroid(), Some(c));
    }

    #[test]
    fn test_closed_polygon_centroid() {
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert_eq!(Geometry::Polygon(ring).centroid(), Some(Coordinate::new(1.0, 1.0)));
    }

    #[test]
    fn test_empty_line_has_no_centroid() {
        assert_eq!(Geometry::LineString(Vec::new()).centroid(), None);
    }
}
