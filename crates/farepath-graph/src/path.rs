//! Cheapest-route search.
//!
//! [`find_best_route`] is Dijkstra over a [`RouteGraph`] snapshot with lazy
//! deletion: duplicate queue entries for a node are allowed and every pop of
//! an already-finalized node is discarded. Queue entries carry their full
//! path, so no parent map is needed to reconstruct the result.
//!
//! Ties on accumulated cost are broken by node identifier, then by path,
//! which makes the result deterministic for a given graph.

use crate::{Node, RouteGraph};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;

// ============================================================================
// Result types
// ============================================================================

/// Total cost of a route. `Infinite` is the not-found sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// A reachable route with this total.
    Finite(u64),
    /// No route exists.
    Infinite,
}

impl Cost {
    /// The finite value, if any.
    pub fn finite(self) -> Option<u64> {
        match self {
            Self::Finite(value) => Some(value),
            Self::Infinite => None,
        }
    }

    /// True for the not-found sentinel.
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(value) => write!(f, "{value}"),
            Self::Infinite => f.write_str("inf"),
        }
    }
}

/// Outcome of a route search.
///
/// A found route has a path from start to end inclusive and a finite cost.
/// Not found is an empty path with [`Cost::Infinite`]; it is a normal result,
/// not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRoute {
    /// Nodes from start to end inclusive; empty when not found.
    pub path: Vec<Node>,
    /// Total cost of `path`.
    pub cost: Cost,
}

impl BestRoute {
    /// The not-found result.
    pub fn not_found() -> Self {
        Self {
            path: Vec::new(),
            cost: Cost::Infinite,
        }
    }

    /// True when a route was found.
    pub fn is_found(&self) -> bool {
        !self.path.is_empty() && !self.cost.is_infinite()
    }

    /// True when the route was found and ends at `end`.
    pub fn reaches(&self, end: &Node) -> bool {
        self.is_found() && self.path.last() == Some(end)
    }

    /// Join the path with `separator`, e.g. `"GRU - BRC - CDG"`.
    pub fn render(&self, separator: &str) -> String {
        self.path
            .iter()
            .map(Node::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

// ============================================================================
// Search
// ============================================================================

/// A partial route waiting in the queue. Field order is the heap order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    cost: u64,
    node: Node,
    path: Vec<Node>,
}

/// Find the cheapest route from `start` to `end`.
///
/// Edge costs are non-negative by construction. `start == end` yields a
/// single-node path with cost zero, whether or not the node is in the graph.
/// The search is synchronous and runs to completion.
pub fn find_best_route(graph: &RouteGraph, start: &Node, end: &Node) -> BestRoute {
    let mut queue = BinaryHeap::new();
    let mut visited: HashSet<Node> = HashSet::new();

    queue.push(Reverse(Candidate {
        cost: 0,
        node: start.clone(),
        path: Vec::new(),
    }));

    while let Some(Reverse(Candidate {
        cost,
        node,
        mut path,
    })) = queue.pop()
    {
        if visited.contains(&node) {
            continue;
        }

        path.push(node.clone());
        visited.insert(node.clone());
        if node == *end {
            return BestRoute {
                path,
                cost: Cost::Finite(cost),
            };
        }

        for edge in graph.neighbors(node.as_str()) {
            if visited.contains(&edge.to) {
                continue;
            }
            queue.push(Reverse(Candidate {
                cost: cost.saturating_add(edge.cost),
                node: edge.to.clone(),
                path: path.clone(),
            }));
        }
    }

    BestRoute::not_found()
}

// ============================================================================
// Tests
// ============================================================================
