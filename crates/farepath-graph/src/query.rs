//! Response types for route queries.
//!
//! This module provides the structured payloads the HTTP API and the CLI
//! return. All types derive `Serialize`/`Deserialize` for JSON transport.

use crate::path::BestRoute;
use crate::stats::GraphStats;
use serde::{Deserialize, Serialize};

/// Separator used when a path is rendered for display.
pub const ROUTE_SEPARATOR: &str = " - ";

// ============================================================================
// Route
// ============================================================================

/// A found route: rendered path plus total price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Path nodes joined by [`ROUTE_SEPARATOR`].
    pub route: String,
    /// Total cost.
    pub price: u64,
}

impl RouteResponse {
    /// Build a response from a search result; `None` when nothing was found.
    pub fn from_best_route(best: &BestRoute) -> Option<Self> {
        let price = best.cost.finite()?;
        if best.path.is_empty() {
            return None;
        }
        Some(Self {
            route: best.render(ROUTE_SEPARATOR),
            price,
        })
    }
}

// ============================================================================
// Generic payloads
// ============================================================================

/// A success message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a message payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An error payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error.
    pub error: String,
}

impl ErrorResponse {
    /// Create an error payload.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Liveness payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process can answer.
    pub status: String,
}

impl HealthResponse {
    /// The healthy payload.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

// ============================================================================
// Graph info
// ============================================================================

/// Response for graph info query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphInfoResponse {
    /// Total number of locations.
    pub node_count: usize,
    /// Total number of registered routes.
    pub route_count: usize,
    /// Full statistics.
    pub stats: GraphStats,
}

impl From<GraphStats> for GraphInfoResponse {
    fn from(stats: GraphStats) -> Self {
        Self {
            node_count: stats.node_count,
            route_count: stats.record_count,
            stats,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cost, Node};

    #[test]
    fn test_route_response_from_found() {
        let best = BestRoute {
            path: vec![Node::new("GRU"), Node::new("EWR"), Node::new("JFK")],
            cost: Cost::Finite(40),
        };
        let response = RouteResponse::from_best_route(&best).unwrap();
        assert_eq!(response.route, "GRU - EWR - JFK");
        assert_eq!(response.price, 40);
    }

    #[test]
    fn test_route_response_from_not_found() {
        assert!(RouteResponse::from_best_route(&BestRoute::not_found()).is_none());
    }

    #[test]
    fn test_route_response_serialization() {
        let response = RouteResponse {
            route: "GRU - BRC".to_string(),
            price: 10,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"route": "GRU - BRC", "price": 10}));
    }

    #[test]
    fn test_error_and_message_serialization() {
        let json = serde_json::to_string(&ErrorResponse::new("Route not found")).unwrap();
        assert_eq!(json, r#"{"error":"Route not found"}"#);

        let json = serde_json::to_string(&MessageResponse::new("ok")).unwrap();
        assert_eq!(json, r#"{"message":"ok"}"#);
    }

    #[test]
    fn test_health_serialization() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert_eq!(json, r#"{"status":"healthy"}"#);
    }

    #[test]
    fn test_graph_info_from_stats() {
        let stats = GraphStats {
            node_count: 5,
            edge_count: 14,
            record_count: 7,
            ..Default::default()
        };
        let info = GraphInfoResponse::from(stats);
        assert_eq!(info.node_count, 5);
        assert_eq!(info.route_count, 7);
        assert_eq!(info.stats.edge_count, 14);
    }
}
