//! Time-stamped shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, Geometry};
use crate::{Error, Result};

/// A point in time. Every timestamp is normalized to UTC on the way in.
pub type Timestamp = DateTime<Utc>;

/// The closed time span a shape is valid for. An instant has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    start: Timestamp,
    end: Timestamp,
}

impl TimeSpan {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn instant(at: Timestamp) -> Self {
        Self { start: at, end: at }
    }

    pub fn start(&self) -> Timestamp { self.start }
    pub fn end(&self) -> Timestamp { self.end }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

/// A geometry bound to a time span, with free-form string properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoShape {
    pub geometry: Geometry,
    pub span: TimeSpan,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl GeoShape {
    pub fn new(geometry: Geometry, span: TimeSpan) -> Self {
        Self { geometry, span, properties: BTreeMap::new() }
    }

    /// A point observed at a single instant, in any timezone.
    pub fn point<Tz: TimeZone>(coordinate: Coordinate, at: DateTime<Tz>) -> Self {
        Self::new(Geometry::Point(coordinate), TimeSpan::instant(at.with_timezone(&Utc)))
    }

    /// A point observed at a naive datetime, read as UTC.
    pub fn at_naive(coordinate: Coordinate, at: NaiveDateTime) -> Self {
        Self::point(coordinate, Utc.from_utc_datetime(&at))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn start(&self) -> Timestamp { self.span.start }
    pub fn end(&self) -> Timestamp { self.span.end }

    pub fn centroid(&self) -> Option<Coordinate> {
        self.geometry.centroid()
    }
}
