//! Timehash — geohash-style strings for points in time.
//!
//! The range `[0, 4039372800]` Unix seconds (1970 to 2098) is bisected
//! three times per character; each character picks one of eight equal
//! sub-ranges from the alphabet `01abcdef`. One character resolves 16 years,
//! ten characters about 3.6 seconds.

use chrono::TimeDelta;
use smallvec::SmallVec;

use crate::model::{GeoShape, Timestamp};
use crate::{Error, Result};

const ALPHABET: &[u8; 8] = b"01abcdef";
const RANGE_END_SECONDS: f64 = 4_039_372_800.0;

/// Finest timehash precision with a known step.
pub const MAX_PRECISION: u8 = 10;

/// Timehashes of one shape. Most shapes cover only a few buckets.
pub type TimehashList = SmallVec<[String; 4]>;

/// Encode Unix `seconds` as a timehash of `precision` characters.
pub fn encode_timehash(seconds: f64, precision: u8) -> Result<String> {
    check_precision(precision)?;

    let (mut low, mut high) = (0.0_f64, RANGE_END_SECONDS);
    let mut hash = String::with_capacity(precision as usize);
    while hash.len() < precision as usize {
        let mut symbol = 0usize;
        for bit in [4, 2, 1] {
            let mid = (low + high) / 2.0;
            if seconds > mid {
                symbol |= bit;
                low = mid;
            } else {
                high = mid;
            }
        }
        hash.push(ALPHABET[symbol] as char);
    }
    Ok(hash)
}

/// Step used to walk a time span at `precision`, slightly under the bucket
/// width so no bucket is skipped.
pub fn precision_delta(precision: u8) -> Result<TimeDelta> {
    let delta = match precision {
        1 => TimeDelta::days(5840),
        2 => TimeDelta::days(730),
        3 => TimeDelta::seconds(7_879_680), // 91.2 days
        4 => TimeDelta::seconds(984_960),   // 11.4 days
        5 => TimeDelta::seconds(123_120),   // 34.2 hours
        6 => TimeDelta::seconds(15_120),    // 4.2 hours
        7 => TimeDelta::minutes(32),
        8 => TimeDelta::minutes(4),
        9 => TimeDelta::seconds(30),
        10 => TimeDelta::milliseconds(3600),
        other => return Err(Error::UnsupportedPrecision(other)),
    };
    Ok(delta)
}

fn check_precision(precision: u8) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(Error::UnsupportedPrecision(precision));
    }
    Ok(())
}

/// Unix seconds (with fraction) from `start` to `end` inclusive, stepping by
/// [`precision_delta`].
pub fn generate_times(start: Timestamp, end: Timestamp, precision: u8) -> Result<Vec<f64>> {
    let step = precision_delta(precision)?;
    if start > end {
        return Err(Error::InvalidTimeRange { start, end });
    }

    let mut times = Vec::new();
    let mut at = start;
    while at <= end {
        times.push(unix_seconds(at));
        match at.checked_add_signed(step) {
            Some(next) => at = next,
            None => break,
        }
    }
    Ok(times)
}

/// The timehashes covering a shape's own time span, in time order without
/// repeats. An instant gives exactly one; the bucket holding the span end is
/// always included.
pub fn timehash_shape(shape: &GeoShape, precision: u8) -> Result<TimehashList> {
    let mut times = generate_times(shape.start(), shape.end(), precision)?;
    times.push(unix_seconds(shape.end()));

    let mut hashes = TimehashList::new();
    for t in times {
        let hash = encode_timehash(t, precision)?;
        // time-ordered input, so repeats are adjacent
        if hashes.last() != Some(&hash) {
            hashes.push(hash);
        }
    }
    Ok(hashes)
}

pub(crate) fn unix_seconds(at: Timestamp) -> f64 {
    at.timestamp() as f64 + at.timestamp_subsec_nanos() as f64 / 1e9
}
