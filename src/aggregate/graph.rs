//! Weighted cell graph shared by chronnets and geosynchnets.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::model::CellId;
use crate::{Error, Result};

/// Whether edges have a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    #[default]
    Directed,
    Undirected,
}

impl FromStr for GraphMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "directed" => Ok(GraphMode::Directed),
            "undirected" => Ok(GraphMode::Undirected),
            other => Err(Error::InvalidConfig(format!("unknown graph mode '{other}'"))),
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphMode::Directed => write!(f, "directed"),
            GraphMode::Undirected => write!(f, "undirected"),
        }
    }
}

/// Nodes are cell ids, edges carry an integer weight.
///
/// Undirected edges are stored once under `(min, max)`; lookups accept
/// either order. Nodes and edges iterate in cell-id order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellGraph {
    mode: GraphMode,
    nodes: BTreeSet<CellId>,
    edges: BTreeMap<(CellId, CellId), u64>,
}

impl CellGraph {
    pub fn new(mode: GraphMode) -> Self {
        Self { mode, nodes: BTreeSet::new(), edges: BTreeMap::new() }
    }

    pub fn mode(&self) -> GraphMode { self.mode }
    pub fn is_directed(&self) -> bool { self.mode == GraphMode::Directed }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn add_node(&mut self, cell: &str) {
        if !self.nodes.contains(cell) {
            self.nodes.insert(cell.to_owned());
        }
    }

    /// Add `weight` to the edge `from → to`, creating nodes as needed.
    pub fn add_weight(&mut self, from: &str, to: &str, weight: u64) {
        self.add_node(from);
        self.add_node(to);
        let key = self.key(from, to);
        *self.edges.entry(key).or_insert(0) += weight;
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = ((&str, &str), u64)> {
        self.edges.iter().map(|((a, b), w)| ((a.as_str(), b.as_str()), *w))
    }

    pub fn contains_node(&self, cell: &str) -> bool {
        self.nodes.contains(cell)
    }

    pub fn weight(&self, from: &str, to: &str) -> Option<u64> {
        self.edges.get(&self.key(from, to)).copied()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.weight(from, to).is_some()
    }

    /// Cells with an edge to themselves.
    pub fn self_loops(&self) -> Vec<&str> {
        self.edges.keys().filter(|(a, b)| a == b).map(|(a, _)| a.as_str()).collect()
    }

    pub fn total_weight(&self) -> u64 {
        self.edges.values().sum()
    }

    /// Drop every self-loop; nodes stay.
    pub fn without_self_loops(mut self) -> Self {
        self.edges.retain(|(a, b), _| a != b);
        self
    }

    /// Fold `a → b` and `b → a` into one undirected edge carrying the sum of
    /// both weights.
    pub fn to_undirected(self) -> Self {
        if self.mode == GraphMode::Undirected {
            return self;
        }
        let mut folded = CellGraph { mode: GraphMode::Undirected, nodes: self.nodes, edges: BTreeMap::new() };
        for ((a, b), w) in self.edges {
            let key = folded.key(&a, &b);
            *folded.edges.entry(key).or_insert(0) += w;
        }
        folded
    }

    fn key(&self, from: &str, to: &str) -> (CellId, CellId) {
        if self.mode == GraphMode::Undirected && to < from {
            (to.to_owned(), from.to_owned())
        } else {
            (from.to_owned(), to.to_owned())
        }
    }
}

#[derive(Serialize)]
struct EdgeRecord<'a> {
    from: &'a str,
    to: &'a str,
    weight: u64,
}

impl Serialize for CellGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let edges: Vec<EdgeRecord<'_>> = self
            .edges()
            .map(|((from, to), weight)| EdgeRecord { from, to, weight })
            .collect();
        let mut state = serializer.serialize_struct("CellGraph", 3)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("nodes", &self.nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
