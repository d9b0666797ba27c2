//! Snapshot publication and serialized registration.
//!
//! [`RouteGuard`] keeps three things apart:
//!
//! - the [`GraphStore`] lock, which serializes raw file reads and appends;
//! - a registration lock, which totally orders check-append-reload cycles;
//! - the current-snapshot slot, an `RwLock<Arc<RouteGraph>>` that is only
//!   ever replaced by a single pointer swap.
//!
//! Readers clone the `Arc` and search outside every lock, so a registration
//! that completes mid-query never changes what that query sees.

use crate::path::{BestRoute, find_best_route};
use crate::store::GraphStore;
use crate::{Node, Record, RouteGraph};
use farepath_core::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Shared owner of the route store and the graph snapshot readers query.
///
/// `RouteGuard` is `Send + Sync`; wrap it in an `Arc` to share it between
/// the async server and the console thread.
#[derive(Debug)]
pub struct RouteGuard {
    store: GraphStore,
    current: RwLock<Arc<RouteGraph>>,
    registration: Mutex<()>,
}

impl RouteGuard {
    /// Open the record file at `path` and load the first snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_store(GraphStore::new(path))
    }

    /// Build a guard around an existing store, loading the first snapshot.
    pub fn with_store(store: GraphStore) -> Result<Self> {
        let graph = store.load()?;
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(graph)),
            registration: Mutex::new(()),
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// The graph current at the time of the call.
    ///
    /// The returned snapshot stays valid and unchanged for as long as the
    /// caller holds it, regardless of later registrations.
    pub fn snapshot(&self) -> Arc<RouteGraph> {
        // Only whole `Arc`s are ever stored, so a poisoned slot is still consistent.
        let slot = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*slot)
    }

    /// Cheapest route between two raw identifiers against the current snapshot.
    pub fn best_route(&self, from: &str, to: &str) -> BestRoute {
        let graph = self.snapshot();
        find_best_route(&graph, &Node::new(from), &Node::new(to))
    }

    /// Register a new connection.
    ///
    /// Rejects blank identifiers and negative prices before touching the
    /// store. Rejects the registration as a conflict when the current graph
    /// already holds a forward edge `from -> to`. Otherwise appends one
    /// record, rebuilds the graph from the file and publishes it.
    ///
    /// On any failure the previous snapshot remains current.
    pub fn register(&self, from: &str, to: &str, price: i64) -> Result<Record> {
        let origin = Node::new(from);
        let destination = Node::new(to);
        if origin.is_empty() || destination.is_empty() {
            return Err(Error::validation(
                "Fields 'from' and 'to' must not be blank",
            ));
        }
        let cost = u64::try_from(price)
            .map_err(|_| Error::validation(format!("price must be non-negative, got {price}")))?;

        let _order = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = self
            .snapshot()
            .forward_cost(origin.as_str(), destination.as_str())
        {
            log::debug!("Rejected duplicate route {origin} -> {destination}");
            return Err(Error::conflict(origin.as_str(), destination.as_str(), existing));
        }

        let record = Record {
            origin,
            destination,
            cost,
        };
        self.store.append(&record)?;
        let graph = self.store.load()?;
        self.publish(graph);

        log::info!(
            "Registered route {} -> {} ({})",
            record.origin,
            record.destination,
            record.cost
        );
        Ok(record)
    }

    /// Rebuild the graph from the file and publish it.
    pub fn reload(&self) -> Result<Arc<RouteGraph>> {
        let _order = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let graph = self.store.load()?;
        Ok(self.publish(graph))
    }

    fn publish(&self, graph: RouteGraph) -> Arc<RouteGraph> {
        let fresh = Arc::new(graph);
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Arc::clone(&fresh);
        fresh
    }
}

/// Parse a user-supplied price.
///
/// Accepts an optionally signed base-10 integer with surrounding whitespace.
/// The sign is checked by [`RouteGuard::register`].
pub fn parse_price(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| Error::validation(format!("price '{trimmed}' is not an integer")))
}

// ============================================================================
// Tests
// ============================================================================
