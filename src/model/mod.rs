//! # Track Model
//!
//! Plain data types that every conversion consumes or produces:
//! time-stamped shapes, the tracks that order them, and the cell-count
//! maps that spatial hashers return.
//!
//! Hashing and graph assembly live elsewhere; nothing here knows about
//! cells beyond their id.

pub mod coordinate;
pub mod shape;
pub mod track;
pub mod cells;

pub use coordinate::{Coordinate, Geometry};
pub use shape::{GeoShape, TimeSpan, Timestamp};
pub use track::Track;
pub use cells::{CellCounts, CellId, IntervalLabel};
