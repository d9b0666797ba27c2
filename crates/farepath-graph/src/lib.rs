//! Route graph infrastructure for farepath.
//!
//! This crate provides the record-file store, the cheapest-path engine,
//! and the snapshot discipline that lets queries run concurrently with
//! registrations.
//!
//! # Key Abstractions
//!
//! - [`GraphStore`]: owns the append-only record file and its lock
//! - [`RouteGraph`]: immutable adjacency built from every record
//! - [`find_best_route`]: Dijkstra search returning a [`BestRoute`]
//! - [`RouteGuard`]: current-snapshot slot plus serialized registration

#![doc = include_str!("../README.md")]

pub mod guard;
pub mod path;
pub mod query;
pub mod stats;
pub mod store;
pub mod types;

pub use guard::{RouteGuard, parse_price};
pub use path::{BestRoute, Cost, find_best_route};
pub use query::{
    ErrorResponse, GraphInfoResponse, HealthResponse, MessageResponse, ROUTE_SEPARATOR,
    RouteResponse,
};
pub use stats::{GraphStats, compute_stats, quick_summary};
pub use store::{GraphStore, append_route, load_routes, parse_routes};
pub use types::{Edge, Node, Record, RouteGraph};
