//! Spatial cell ids, cell-count maps and interval labels.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Spatial cell identifier as produced by a hasher.
pub type CellId = String;

/// Cell id → number of shapes hashed into it. Ordered, so iteration (and
/// everything assembled from it) is deterministic.
pub type CellCounts = BTreeMap<CellId, u64>;

const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The `[start, end)` interval a partition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntervalLabel {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl IntervalLabel {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for IntervalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.start.format(LABEL_FORMAT), self.end.format(LABEL_FORMAT))
    }
}
