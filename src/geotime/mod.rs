//! # Geotimehash
//!
//! Joint spatial × temporal hashing: every shape contributes its spatial
//! cells crossed with the timehash buckets its span covers.

pub mod timehash;
pub mod combine;

pub use timehash::{
    MAX_PRECISION, TimehashList, encode_timehash, precision_delta, generate_times, timehash_shape,
};
pub use combine::{GeoTimeKey, GeoTimeHashMap, convert_geotimehash};
