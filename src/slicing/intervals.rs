//! Interval boundary generation.

use chrono::TimeDelta;
use tracing::debug;

use super::{checked_step, ensure_positive, SlicingConfig};
use crate::model::Timestamp;
use crate::{Error, Result};

/// Unix seconds of `0001-01-01T00:00:00Z`, the origin grid ticks are
/// counted from.
pub const GRID_ANCHOR_UNIX_SECONDS: i64 = -62_135_596_800;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Ordered boundaries covering `[start, end]` in steps of `period`.
///
/// The first boundary is `start + period` (the start itself is not a
/// boundary); stepping stops at the first value `>= end`. That last value is
/// nudged forward by one second so an event at exactly `end` falls inside
/// the final `[begin, boundary)` slice. A single-instant span still yields
/// one boundary.
///
/// Fails on a zero or negative period, or when `start > end`.
pub fn generate_boundaries(start: Timestamp, end: Timestamp, period: TimeDelta) -> Result<Vec<Timestamp>> {
    SlicingConfig::default().boundaries(start, end, period)
}

pub(crate) fn boundaries_with_epsilon(
    start: Timestamp,
    end: Timestamp,
    period: TimeDelta,
    epsilon: TimeDelta,
) -> Result<Vec<Timestamp>> {
    ensure_positive(period)?;
    if start > end {
        return Err(Error::InvalidTimeRange { start, end });
    }

    let mut boundaries = Vec::new();
    let mut cursor = start;
    loop {
        cursor = checked_step(cursor, period)?;
        boundaries.push(cursor);
        if cursor >= end {
            break;
        }
    }

    // Make the last boundary inclusive of `end`
    if let Some(last) = boundaries.last_mut() {
        *last = checked_step(*last, epsilon)?;
    }

    debug!(%start, %end, %period, count = boundaries.len(), "generated interval boundaries");
    Ok(boundaries)
}

/// Round `at` down to the nearest multiple of `period` counted from
/// [`GRID_ANCHOR_UNIX_SECONDS`], so hourly periods land on the hour and
/// daily periods on midnight UTC.
pub fn round_down(at: Timestamp, period: TimeDelta) -> Result<Timestamp> {
    ensure_positive(period)?;
    let since_anchor = (at.timestamp() as i128 - GRID_ANCHOR_UNIX_SECONDS as i128) * NANOS_PER_SECOND
        + at.timestamp_subsec_nanos() as i128;
    let remainder = since_anchor.rem_euclid(nanos_of(period));
    at.checked_sub_signed(delta_of(remainder)).ok_or(Error::TimestampOverflow(at))
}

/// Calendar-aligned ticks for the time grid.
///
/// Starts at `round_down(start, period)` and steps by `period` through every
/// tick `<= end`, then appends one trailing tick past `end` so the last row
/// has a closing edge. Always at least two entries; consecutive pairs are the
/// grid rows.
pub fn generate_aligned_boundaries(start: Timestamp, end: Timestamp, period: TimeDelta) -> Result<Vec<Timestamp>> {
    ensure_positive(period)?;
    if start > end {
        return Err(Error::InvalidTimeRange { start, end });
    }

    let mut tick = round_down(start, period)?;
    let mut ticks = vec![tick];
    while tick <= end {
        tick = checked_step(tick, period)?;
        ticks.push(tick);
    }

    debug!(%start, %end, %period, rows = ticks.len() - 1, "generated aligned boundaries");
    Ok(ticks)
}

pub(crate) fn nanos_of(delta: TimeDelta) -> i128 {
    delta.num_seconds() as i128 * NANOS_PER_SECOND + delta.subsec_nanos() as i128
}

/// Inverse of [`nanos_of`] for values that came from a valid `TimeDelta`.
pub(crate) fn delta_of(nanos: i128) -> TimeDelta {
    TimeDelta::seconds((nanos / NANOS_PER_SECOND) as i64)
        + TimeDelta::nanoseconds((nanos % NANOS_PER_SECOND) as i64)
}
