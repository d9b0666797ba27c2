//! Handler functions for the one-shot route commands.
//!
//! These implement `route`, `register` and `graph stats` against the route
//! file directly, without starting the server or the console.

use farepath_core::{Error, Result};
use farepath_graph::{
    GraphInfoResponse, Node, ROUTE_SEPARATOR, RouteGuard, compute_stats, parse_price,
};
use std::path::Path;

/// Print the cheapest route between two locations.
pub async fn handle_route(path: &Path, from: &str, to: &str) -> Result<()> {
    let guard = RouteGuard::open(path)?;
    let destination = Node::new(to);
    let best = guard.best_route(from, to);

    match best.cost.finite() {
        Some(price) if best.reaches(&destination) => {
            println!("Best route: {} > ${price}", best.render(ROUTE_SEPARATOR));
            Ok(())
        }
        _ => Err(Error::not_found(format!(
            "route from {} to {destination}",
            Node::new(from)
        ))),
    }
}

/// Register a new connection and persist it.
pub async fn handle_register(path: &Path, from: &str, to: &str, price: &str) -> Result<()> {
    let price = parse_price(price)?;
    let guard = RouteGuard::open(path)?;
    let record = guard.register(from, to, price)?;

    println!(
        "Route successfully registered: {} - {} > ${}",
        record.origin, record.destination, record.cost
    );
    Ok(())
}

/// Show graph statistics.
pub async fn handle_stats(path: &Path, json: bool) -> Result<()> {
    let guard = RouteGuard::open(path)?;
    let stats = compute_stats(&guard.snapshot());

    if json {
        let info = GraphInfoResponse::from(stats);
        let text = serde_json::to_string_pretty(&info)
            .map_err(|e| Error::config(format!("could not encode stats: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("Route Statistics");
    println!("================");
    println!("File:           {}", path.display());
    println!("Locations:      {}", stats.node_count);
    println!("Routes:         {}", stats.record_count);
    println!("Directed edges: {}", stats.edge_count);
    println!("Avg degree:     {:.2}", stats.avg_degree);
    if let Some(ref node) = stats.busiest_node {
        println!("Busiest:        {node} ({} connections)", stats.max_degree);
    }
    if let (Some(min), Some(max)) = (stats.min_cost, stats.max_cost) {
        println!("Price range:    ${min} - ${max}");
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
