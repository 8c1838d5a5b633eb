//! Chronnets — cells linked across consecutive intervals.
//!
//! For every pair of consecutive populated intervals `(i, i+1)` each cell
//! occurrence in `i` is paired with each cell occurrence in `i+1`; the weight of `a → b`
//! is the number of such pairs, summed over all adjacent pairs. With counts
//! `k_a` and `k_b` that is `k_a * k_b` per interval pair.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{hash_intervals, CellGraph, GraphMode, LabeledCounts};
use crate::hasher::SpatialHasher;
use crate::model::Track;
use crate::slicing::SlicingConfig;
use crate::Result;

/// Chronnet build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronnetConfig {
    /// Keep `a → a` edges (a cell seen in two consecutive intervals).
    pub self_loops: bool,
    /// Undirected graphs fold `a → b` and `b → a` into one summed edge.
    pub mode: GraphMode,
    /// Skip empty intervals when pairing neighbours, linking the populated
    /// intervals on either side of a gap. When off, a gap breaks the chain.
    pub bridge_empty_intervals: bool,
}

impl Default for ChronnetConfig {
    fn default() -> Self {
        Self { self_loops: true, mode: GraphMode::Directed, bridge_empty_intervals: true }
    }
}

/// Build a chronnet from hashed intervals.
///
/// Intervals are taken in time order regardless of input order. Fewer than
/// two intervals, or no populated adjacent pair, gives an empty graph and a
/// warning rather than an error.
pub fn chronnet_create(hashed: &[LabeledCounts], config: &ChronnetConfig) -> CellGraph {
    let mut sequence: Vec<&LabeledCounts> = hashed
        .iter()
        .filter(|h| !config.bridge_empty_intervals || !h.counts.is_empty())
        .collect();
    sequence.sort_by_key(|h| h.label);

    if sequence.len() < 2 {
        warn!(intervals = sequence.len(), "chronnet needs at least two intervals; returning an empty graph");
        return CellGraph::new(config.mode);
    }

    let mut net = CellGraph::new(GraphMode::Directed);
    for pair in sequence.windows(2) {
        let (before, after) = (pair[0], pair[1]);
        for (from, k_from) in &before.counts {
            for (to, k_to) in &after.counts {
                net.add_weight(from, to, k_from * k_to);
            }
        }
    }

    if net.edge_count() == 0 {
        warn!(intervals = sequence.len(), "no cells in consecutive intervals; returning an empty graph");
        return CellGraph::new(config.mode);
    }

    for h in &sequence {
        for cell in h.counts.keys() {
            net.add_node(cell);
        }
    }

    if !config.self_loops {
        net = net.without_self_loops();
    }
    if config.mode == GraphMode::Undirected {
        net = net.to_undirected();
    }

    debug!(nodes = net.node_count(), edges = net.edge_count(), weight = net.total_weight(), "built chronnet");
    net
}

/// Slice `track` into `period`-long intervals, hash them and build a chronnet.
pub fn convert_chronnet<H>(track: &Track, period: TimeDelta, hasher: &H, config: &ChronnetConfig) -> Result<CellGraph>
where
    H: SpatialHasher + ?Sized,
{
    let hashed = hash_intervals(track, period, hasher, &SlicingConfig::default())?;
    Ok(chronnet_create(&hashed, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use crate::model::{CellCounts, IntervalLabel, Timestamp};

    fn at(h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2020, 1, 1, h, 0, 0).unwrap()
    }

    fn interval(h: u32, cells: &[(&str, u64)]) -> LabeledCounts {
        let counts: CellCounts = cells.iter().map(|(c, n)| (c.to_string(), *n)).collect();
        LabeledCounts::new(IntervalLabel::new(at(h), at(h + 1)), counts)
    }

    fn sample() -> Vec<LabeledCounts> {
        vec![
            interval(8, &[("32167", 1)]),
            interval(9, &[("32b07", 1), ("3056", 1), ("3078", 1)]),
            interval(10, &[("3078", 1)]),
        ]
    }

    #[test]
    fn test_directed_with_self_loops() {
        let net = chronnet_create(&sample(), &ChronnetConfig::default());
        assert!(net.is_directed());
        assert_eq!(net.nodes().next(), Some("3056"));
        assert_eq!(net.self_loops(), vec!["3078"]);
        assert_eq!(net.weight("32167", "3056"), Some(1));
        assert_eq!(net.weight("3056", "32167"), None);
        assert_eq!(net.total_weight(), 3 + 3);
    }

    #[test]
    fn test_self_loops_dropped() {
        let config = ChronnetConfig { self_loops: false, ..Default::default() };
        let net = chronnet_create(&sample(), &config);
        assert!(net.self_loops().is_empty());
        assert!(net.contains_node("3078"));
    }

    #[test]
    fn test_undirected() {
        let config = ChronnetConfig { mode: GraphMode::Undirected, ..Default::default() };
        let net = chronnet_create(&sample(), &config);
        assert!(!net.is_directed());
        assert!(net.has_edge("3056", "32167"));
    }

    #[test]
    fn test_counts_multiply() {
        let net = chronnet_create(&[interval(8, &[("a", 2)]), interval(9, &[("b", 3)])], &ChronnetConfig::default());
        assert_eq!(net.weight("a", "b"), Some(6));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut shuffled = sample();
        shuffled.reverse();
        assert_eq!(
            chronnet_create(&shuffled, &ChronnetConfig::default()),
            chronnet_create(&sample(), &ChronnetConfig::default())
        );
    }

    #[test]
    fn test_gap_is_bridged_by_default() {
        let gapped = vec![interval(8, &[("a", 1)]), interval(9, &[]), interval(10, &[("b", 1)])];
        let net = chronnet_create(&gapped, &ChronnetConfig::default());
        assert_eq!(net.weight("a", "b"), Some(1));
        assert_eq!(net.node_count(), 2);

        let strict = ChronnetConfig { bridge_empty_intervals: false, ..Default::default() };
        assert!(chronnet_create(&gapped, &strict).is_empty());
    }

    #[test]
    fn test_single_interval_is_empty() {
        let net = chronnet_create(&[interval(8, &[("a", 4)])], &ChronnetConfig::default());
        assert!(net.is_empty());
        assert_eq!(net.edge_count(), 0);
    }
}
