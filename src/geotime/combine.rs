//! Geotimehash — (cell, timehash) pairs weighted by share of shapes.

use std::collections::BTreeMap;
use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use super::timehash::{precision_delta, timehash_shape};
use crate::hasher::SpatialHasher;
use crate::model::*;
use crate::Result;

/// A spatial cell paired with a timehash bucket.
///
/// Kept as two fields so neither side has to avoid the `_` used by the
/// joined display form `"{cell}_{timehash}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GeoTimeKey {
    pub cell: CellId,
    pub timehash: String,
}

impl GeoTimeKey {
    pub fn new(cell: impl Into<CellId>, timehash: impl Into<String>) -> Self {
        Self { cell: cell.into(), timehash: timehash.into() }
    }
}

impl fmt::Display for GeoTimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.cell, self.timehash)
    }
}

/// Normalized geotimehash weights.
///
/// The weight of `(cell, timehash)` is the fraction of shapes touching the
/// timehash bucket that were located in the cell, so it lies in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoTimeHashMap {
    weights: BTreeMap<GeoTimeKey, f64>,
    shapes_per_timehash: BTreeMap<String, u64>,
}

impl GeoTimeHashMap {
    pub fn len(&self) -> usize { self.weights.len() }
    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn get(&self, cell: &str, timehash: &str) -> Option<f64> {
        self.weights.get(&GeoTimeKey::new(cell, timehash)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeoTimeKey, f64)> {
        self.weights.iter().map(|(k, w)| (k, *w))
    }

    /// Number of shapes that contributed to `timehash`.
    pub fn shape_count(&self, timehash: &str) -> u64 {
        self.shapes_per_timehash.get(timehash).copied().unwrap_or(0)
    }

    /// Timehash buckets seen, in order.
    pub fn timehashes(&self) -> impl Iterator<Item = &str> {
        self.shapes_per_timehash.keys().map(String::as_str)
    }

    /// Weight before normalization: number of shapes at `cell` in `timehash`.
    pub fn raw_weight(&self, cell: &str, timehash: &str) -> Option<f64> {
        self.get(cell, timehash).map(|w| w * self.shape_count(timehash) as f64)
    }

    /// Flatten to `"{cell}_{timehash}"` string keys.
    pub fn to_joined(&self) -> BTreeMap<String, f64> {
        self.weights.iter().map(|(k, w)| (k.to_string(), *w)).collect()
    }
}

impl Serialize for GeoTimeHashMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.weights.iter().map(|(k, w)| (k.to_string(), *w)))
    }
}

/// Combine per-shape spatial cells with per-shape timehashes.
///
/// Each shape is hashed on its own; every one of its cells is paired with
/// every timehash covering its span, each pair weighing 1. Pairs are summed
/// across shapes and divided by the number of shapes that produced any pair
/// in that timehash bucket. A shape spanning several buckets weighs 1 in
/// each of them.
pub fn convert_geotimehash<H>(track: &Track, precision: u8, hasher: &H) -> Result<GeoTimeHashMap>
where
    H: SpatialHasher + ?Sized,
{
    precision_delta(precision)?;
    if track.is_empty() {
        warn!("empty track: returning an empty geotimehash");
        return Ok(GeoTimeHashMap::default());
    }

    let mut raw: HashMap<GeoTimeKey, u64> = HashMap::new();
    let mut shapes_per_timehash: HashMap<String, u64> = HashMap::new();

    for shape in track {
        let cells = hasher.hash_track(&Track::singleton(shape.clone()));
        if cells.is_empty() {
            continue;
        }
        let timehashes = timehash_shape(shape, precision)?;
        for timehash in &timehashes {
            *shapes_per_timehash.entry_ref(timehash.as_str()).or_insert(0) += 1;
            for cell in cells.keys() {
                *raw.entry(GeoTimeKey::new(cell.as_str(), timehash.as_str())).or_insert(0) += 1;
            }
        }
    }

    let weights: BTreeMap<GeoTimeKey, f64> = raw
        .into_iter()
        .map(|(key, count)| {
            let shapes = shapes_per_timehash.get(&key.timehash).copied().unwrap_or(1);
            (key, count as f64 / shapes as f64)
        })
        .collect();

    debug!(keys = weights.len(), buckets = shapes_per_timehash.len(), "built geotimehash");
    Ok(GeoTimeHashMap { weights, shapes_per_timehash: shapes_per_timehash.into_iter().collect() })
}
