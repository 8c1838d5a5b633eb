//! # geochron — Spatio-temporal representations of tracks
//!
//! Turns a [`Track`] of time-stamped shapes into the representations used
//! for movement analytics: time-binned cell tables ("timehex"), chronnets,
//! geosynchnets, geotimehash maps and fixed-width time grids.
//!
//! ## Design Principles
//!
//! 1. **One partition engine**: every representation is built from the same
//!    boundary generation + track partitioning pass in [`slicing`]
//! 2. **Hashing is injected**: [`SpatialHasher`] is the contract between the
//!    conversions and any cell scheme (H3, geohash, a plain grid)
//! 3. **Pure functions**: no shared state, no I/O; equal input gives equal output
//! 4. **Degenerate is not an error**: a too-short track yields an empty result
//!    and a `tracing` warning, bad configuration yields an [`Error`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use geochron::{ChronnetConfig, Coordinate, GeoShape, GridHasher, Track};
//!
//! # fn example() -> geochron::Result<()> {
//! let at = |h, m| Utc.with_ymd_and_hms(2020, 1, 1, h, m, 0).unwrap();
//! let track = Track::new([
//!     GeoShape::point(Coordinate::new(-0.104154, 51.511920), at(8, 5)),
//!     GeoShape::point(Coordinate::new(-0.096533, 51.511903), at(9, 23)),
//! ]);
//!
//! let hasher = GridHasher::new(18)?;
//! let net = geochron::convert_chronnet(&track, TimeDelta::hours(1), &hasher, &ChronnetConfig::default())?;
//! for ((from, to), weight) in net.edges() {
//!     println!("{from} -> {to}: {weight}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Representations
//!
//! | Representation | Entry point | Output |
//! |----------------|-------------|--------|
//! | timehex | [`convert_timehex`] | [`TimeHexTable`] |
//! | chronnet | [`convert_chronnet`] | [`CellGraph`] (directed by default) |
//! | geosynchnet | [`convert_geosynchnet`] | [`CellGraph`] (undirected) |
//! | geotimehash | [`convert_geotimehash`] | [`GeoTimeHashMap`] |
//! | time grid | [`convert_time_grid`] | [`TimeGrid`] |
//!
//! [`convert`] dispatches on a [`Representation`] and a serde-loadable
//! [`ConvertConfig`].

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod slicing;
pub mod hasher;
pub mod aggregate;
pub mod timegrid;
pub mod geotime;
pub mod convert;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Coordinate, Geometry, GeoShape, TimeSpan, Timestamp, Track,
    CellCounts, CellId, IntervalLabel,
};

// ============================================================================
// Re-exports: Slicing
// ============================================================================

pub use slicing::{
    SlicingConfig, generate_boundaries, generate_aligned_boundaries, round_down,
    partition, partition_aligned,
};

// ============================================================================
// Re-exports: Hashing + aggregation
// ============================================================================

pub use hasher::{SpatialHasher, GridHasher};
pub use aggregate::{
    LabeledCounts, hash_partitions, hash_intervals, CellGraph, GraphMode,
    TimeHexRow, TimeHexTable, timehex_table, convert_timehex,
    ChronnetConfig, chronnet_create, convert_chronnet,
    geosynchnet_create, convert_geosynchnet,
};

// ============================================================================
// Re-exports: Time grid + geotimehash
// ============================================================================

pub use timegrid::{GridCell, TimeGrid, TimeGridRow, align_subintervals, build_time_grid, convert_time_grid};
pub use geotime::{
    GeoTimeKey, GeoTimeHashMap, encode_timehash, precision_delta, generate_times,
    timehash_shape, convert_geotimehash,
};

// ============================================================================
// Re-exports: Conversion entry point
// ============================================================================

pub use convert::{Representation, ConvertConfig, Converted, convert, convert_named};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid period: {0} (must be positive)")]
    InvalidPeriod(chrono::TimeDelta),

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: Timestamp, end: Timestamp },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing option '{option}' required by {representation}")]
    MissingOption { option: &'static str, representation: &'static str },

    #[error("Unsupported timehash precision {0}: only 1 through 10 are supported")]
    UnsupportedPrecision(u8),

    #[error("Unsupported representation '{0}': expected timehex, chronnet, geosynchnet, geotimehash or time_grid")]
    UnsupportedRepresentation(String),

    #[error("Timestamp overflow while stepping past {0}")]
    TimestampOverflow(Timestamp),

    #[error("Cell id '{0}' is not a base-16 integer")]
    InvalidHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
