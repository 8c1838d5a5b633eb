//! Geosynchnets — cells linked when they share an interval.

use chrono::TimeDelta;
use tracing::{debug, warn};

use super::{hash_intervals, CellGraph, GraphMode, LabeledCounts};
use crate::hasher::SpatialHasher;
use crate::model::Track;
use crate::slicing::SlicingConfig;
use crate::Result;

/// Build an undirected co-occurrence graph.
///
/// Within each interval every unordered pair of distinct cells gains weight
/// 1, however many times either cell was seen; weights sum across
/// intervals. Every observed cell becomes a node, so a cell alone in all its
/// intervals shows up isolated. There are never self-loops.
pub fn geosynchnet_create(hashed: &[LabeledCounts]) -> CellGraph {
    let mut net = CellGraph::new(GraphMode::Undirected);
    if hashed.is_empty() {
        warn!("no intervals to link; returning an empty geosynchnet");
        return net;
    }

    for h in hashed {
        let cells: Vec<&str> = h
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(cell, _)| cell.as_str())
            .collect();
        for (i, a) in cells.iter().enumerate() {
            net.add_node(a);
            for b in &cells[i + 1..] {
                net.add_weight(a, b, 1);
            }
        }
    }

    debug!(nodes = net.node_count(), edges = net.edge_count(), "built geosynchnet");
    net
}

/// Slice `track` into `period`-long intervals, hash them and link
/// co-occurring cells.
pub fn convert_geosynchnet<H>(track: &Track, period: TimeDelta, hasher: &H) -> Result<CellGraph>
where
    H: SpatialHasher + ?Sized,
{
    let hashed = hash_intervals(track, period, hasher, &SlicingConfig::default())?;
    Ok(geosynchnet_create(&hashed))
}
