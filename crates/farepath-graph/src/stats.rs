//! Route graph statistics.
//!
//! Provides a summary of graph size, degree distribution and edge-cost
//! range for the `graph stats` command.

use crate::RouteGraph;
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// Summary statistics about a route graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of distinct locations.
    pub node_count: usize,
    /// Number of directed edges.
    pub edge_count: usize,
    /// Number of records loaded (each becomes two directed edges).
    pub record_count: usize,
    /// Average out-degree per location.
    pub avg_degree: f32,
    /// Highest out-degree.
    pub max_degree: usize,
    /// Location with the highest out-degree (lexicographically first on ties).
    pub busiest_node: Option<String>,
    /// Cheapest edge cost.
    pub min_cost: Option<u64>,
    /// Most expensive edge cost.
    pub max_cost: Option<u64>,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
pub fn compute_stats(graph: &RouteGraph) -> GraphStats {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let avg_degree = if node_count > 0 {
        edge_count as f32 / node_count as f32
    } else {
        0.0
    };

    let mut degrees: Vec<(&str, usize)> = graph
        .node_ids()
        .map(|id| (id, graph.neighbors(id).len()))
        .collect();
    degrees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let (busiest_node, max_degree) = degrees
        .first()
        .map(|(id, degree)| (Some(id.to_string()), *degree))
        .unwrap_or((None, 0));

    let min_cost = graph.iter_edges().map(|(_, edge)| edge.cost).min();
    let max_cost = graph.iter_edges().map(|(_, edge)| edge.cost).max();

    GraphStats {
        node_count,
        edge_count,
        record_count: graph.record_count(),
        avg_degree,
        max_degree,
        busiest_node,
        min_cost,
        max_cost,
    }
}

/// Get a quick summary of graph size.
pub fn quick_summary(graph: &RouteGraph) -> String {
    format!(
        "{} locations, {} routes",
        graph.node_count(),
        graph.record_count()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    fn create_test_graph() -> RouteGraph {
        RouteGraph::from_records([
            Record::new("GRU", "BRC", 10),
            Record::new("BRC", "SCL", 5),
            Record::new("GRU", "CDG", 75),
            Record::new("GRU", "SCL", 20),
        ])
    }

    #[test]
    fn test_compute_stats_basic_counts() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 8);
        assert_eq!(stats.record_count, 4);
        assert_eq!(stats.avg_degree, 2.0);
    }

    #[test]
    fn test_compute_stats_busiest_node() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.busiest_node.as_deref(), Some("GRU"));
        assert_eq!(stats.max_degree, 3);
    }

    #[test]
    fn test_compute_stats_busiest_tie_is_lexicographic() {
        let graph = RouteGraph::from_records([Record::new("B", "A", 1)]);
        let stats = compute_stats(&graph);
        assert_eq!(stats.busiest_node.as_deref(), Some("A"));
    }

    #[test]
    fn test_compute_stats_cost_range() {
        let stats = compute_stats(&create_test_graph());

        assert_eq!(stats.min_cost, Some(5));
        assert_eq!(stats.max_cost, Some(75));
    }

    #[test]
    fn test_compute_stats_empty_graph() {
        let stats = compute_stats(&RouteGraph::new());
        assert_eq!(stats, GraphStats::default());
    }

    #[test]
    fn test_quick_summary() {
        assert_eq!(
            quick_summary(&create_test_graph()),
            "4 locations, 4 routes"
        );
    }
}
