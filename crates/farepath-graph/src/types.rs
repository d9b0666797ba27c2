//! Core graph types.
//!
//! A [`RouteGraph`] is built once from the full set of [`Record`]s and is
//! never mutated afterwards. Changes happen by building a new graph.

use farepath_core::normalize_id;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Node
// ============================================================================

/// A normalized location identifier.
///
/// The inner string is always trimmed and upper-cased, so `"gru"`,
/// `" GRU "` and `"Gru"` are the same node. Ordering is lexicographic on
/// the normalized form, which the path engine relies on for tie-breaking.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Node(String);

impl Node {
    /// Normalize `raw` into a node identifier.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize_id(raw.as_ref()))
    }

    /// The normalized identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when normalization left nothing behind.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Node {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Node {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.0
    }
}

impl Borrow<str> for Node {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Edge / Record
// ============================================================================

/// A directed, weighted connection attached to a source node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Destination node.
    pub to: Node,
    /// Non-negative travel cost.
    pub cost: u64,
}

impl Edge {
    /// Create an edge to `to` with the given cost.
    pub fn new(to: impl Into<Node>, cost: u64) -> Self {
        Self {
            to: to.into(),
            cost,
        }
    }
}

/// One line of the backing file: a single directed connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Origin node.
    pub origin: Node,
    /// Destination node.
    pub destination: Node,
    /// Travel cost.
    pub cost: u64,
}

impl Record {
    /// Create a record, normalizing both identifiers.
    pub fn new(origin: impl Into<Node>, destination: impl Into<Node>, cost: u64) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            cost,
        }
    }
}

// ============================================================================
// RouteGraph
// ============================================================================

/// Adjacency mapping built from every record in the store.
///
/// Each record is inserted in both directions with the same cost. Edge
/// lists keep insertion order. There is no mutation API; a changed store
/// produces a new `RouteGraph`.
#[derive(Clone, Debug, Default)]
pub struct RouteGraph {
    adjacency: HashMap<Node, Vec<Edge>>,
    record_count: usize,
}

impl RouteGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from records, symmetrizing every connection.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut graph = Self::new();
        for record in records {
            graph.insert_record(record);
        }
        graph
    }

    fn insert_record(&mut self, record: Record) {
        let Record {
            origin,
            destination,
            cost,
        } = record;

        self.adjacency
            .entry(origin.clone())
            .or_default()
            .push(Edge::new(destination.clone(), cost));
        self.adjacency
            .entry(destination)
            .or_default()
            .push(Edge::new(origin, cost));
        self.record_count += 1;
    }

    /// Outgoing edges of `node`; empty for unknown nodes.
    pub fn neighbors(&self, node: &str) -> &[Edge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checks if a node exists. Expects a normalized identifier.
    pub fn contains_node(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Cost of the first forward edge `from -> to`, if any.
    pub fn forward_cost(&self, from: &str, to: &str) -> Option<u64> {
        self.neighbors(from)
            .iter()
            .find(|edge| edge.to.as_str() == to)
            .map(|edge| edge.cost)
    }

    /// Returns an iterator over all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(Node::as_str)
    }

    /// Returns an iterator over every directed edge with its source.
    pub fn iter_edges(&self) -> impl Iterator<Item = (&Node, &Edge)> {
        self.adjacency
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (from, edge)))
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed edges (twice the record count).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Number of records the graph was built from.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// True when no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
