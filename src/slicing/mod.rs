//! # Time slicing
//!
//! Boundary generation and track partitioning. Every representation in this
//! crate is assembled from the output of this module:
//!
//! ```text
//! (track, period) → generate_boundaries → [b1, b2, …, bn + ε]
//!                 → partition           → [track[start, b1), track[b1, b2), …]
//! ```
//!
//! The time grid uses the calendar-aligned variant instead:
//! [`generate_aligned_boundaries`] rounds onto multiples of the period and
//! [`partition_aligned`] drops the empty partition that rounding creates in
//! front of the track.

pub mod intervals;
pub mod partition;

pub use intervals::{generate_boundaries, generate_aligned_boundaries, round_down, GRID_ANCHOR_UNIX_SECONDS};
pub use partition::{partition, partition_aligned, interval_labels};

use chrono::TimeDelta;

use crate::model::Timestamp;
use crate::{Error, Result};

/// Boundary nudges applied when slicing.
///
/// `boundary_epsilon` pushes the last interval boundary forward so an event
/// at exactly `track.end` lands in the last `[begin, boundary)` slice.
/// `subinterval_epsilon` pulls the last time-grid sub-boundary backward so
/// it stays inside its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicingConfig {
    pub boundary_epsilon: TimeDelta,
    pub subinterval_epsilon: TimeDelta,
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self {
            boundary_epsilon: TimeDelta::seconds(1),
            subinterval_epsilon: TimeDelta::nanoseconds(1),
        }
    }
}

impl SlicingConfig {
    /// Boundaries covering `[start, end]` in steps of `period`, with this
    /// config's forward nudge. See [`generate_boundaries`].
    pub fn boundaries(&self, start: Timestamp, end: Timestamp, period: TimeDelta) -> Result<Vec<Timestamp>> {
        self.validate()?;
        intervals::boundaries_with_epsilon(start, end, period, self.boundary_epsilon)
    }

    /// Sub-interval edges of one time-grid row, with this config's backward
    /// nudge. See [`crate::timegrid::align_subintervals`].
    pub fn subintervals(&self, segment_start: Timestamp, count: usize, width: TimeDelta) -> Result<Vec<Timestamp>> {
        self.validate()?;
        crate::timegrid::subintervals_with_epsilon(segment_start, count, width, self.subinterval_epsilon)
    }

    pub fn validate(&self) -> Result<()> {
        if self.boundary_epsilon < TimeDelta::zero() || self.subinterval_epsilon < TimeDelta::zero() {
            return Err(Error::InvalidConfig(format!(
                "boundary nudges must not be negative (boundary {}, subinterval {})",
                self.boundary_epsilon, self.subinterval_epsilon,
            )));
        }
        Ok(())
    }
}

/// Step `at` forward by `delta`, failing instead of wrapping.
pub(crate) fn checked_step(at: Timestamp, delta: TimeDelta) -> Result<Timestamp> {
    at.checked_add_signed(delta).ok_or(Error::TimestampOverflow(at))
}

pub(crate) fn ensure_positive(period: TimeDelta) -> Result<()> {
    if period <= TimeDelta::zero() {
        return Err(Error::InvalidPeriod(period));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_nudges() {
        let config = SlicingConfig::default();
        assert_eq!(config.boundary_epsilon, TimeDelta::seconds(1));
        assert_eq!(config.subinterval_epsilon, TimeDelta::nanoseconds(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_nudge_rejected() {
        let config = SlicingConfig { boundary_epsilon: TimeDelta::seconds(-1), ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
