//! End-to-end scenarios over a real record file.

use farepath_graph::{Cost, Node, RouteGuard, load_routes};
use std::path::PathBuf;
use tempfile::TempDir;

const ROUTES: &str = "\
GRU,BRC,10
BRC,SCL,5
GRU,CDG,75
GRU,SCL,20
GRU,ORL,56
ORL,CDG,5
SCL,ORL,20
";

fn setup() -> (TempDir, PathBuf, RouteGuard) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.csv");
    std::fs::write(&path, ROUTES).unwrap();
    let guard = RouteGuard::open(&path).unwrap();
    (dir, path, guard)
}

fn nodes(ids: &[&str]) -> Vec<Node> {
    ids.iter().map(|id| Node::new(id)).collect()
}

#[test]
fn cheapest_route_gru_to_cdg() {
    let (_dir, _path, guard) = setup();

    let route = guard.best_route("GRU", "CDG");

    assert_eq!(route.path, nodes(&["GRU", "BRC", "SCL", "ORL", "CDG"]));
    assert_eq!(route.cost, Cost::Finite(40));
}

#[test]
fn absent_destination_is_not_found() {
    let (_dir, _path, guard) = setup();

    let route = guard.best_route("GRU", "XYZ");

    assert!(route.path.is_empty());
    assert_eq!(route.cost, Cost::Infinite);
}

#[test]
fn every_record_is_symmetric_after_load() {
    let (_dir, path, _guard) = setup();
    let graph = load_routes(&path).unwrap();

    for line in ROUTES.lines() {
        let fields: Vec<&str> = line.split(',').collect();
        let cost: u64 = fields[2].parse().unwrap();
        assert_eq!(graph.forward_cost(fields[0], fields[1]), Some(cost));
        assert_eq!(graph.forward_cost(fields[1], fields[0]), Some(cost));
    }
}

#[test]
fn registration_sequence() {
    let (_dir, path, guard) = setup();

    guard.register("GRU", "EWR", 30).unwrap();
    let route = guard.best_route("GRU", "EWR");
    assert_eq!(route.path, nodes(&["GRU", "EWR"]));
    assert_eq!(route.cost, Cost::Finite(30));

    guard.register("EWR", "JFK", 10).unwrap();
    let route = guard.best_route("GRU", "JFK");
    assert_eq!(route.path, nodes(&["GRU", "EWR", "JFK"]));
    assert_eq!(route.cost, Cost::Finite(40));

    let err = guard.register("GRU", "EWR", 99).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(guard.best_route("GRU", "EWR").cost, Cost::Finite(30));

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{ROUTES}GRU,EWR,30\nEWR,JFK,10\n"));
}

#[test]
fn appended_route_works_in_both_directions_after_reload() {
    let (_dir, path, guard) = setup();

    guard.register("lis", "mad", 12).unwrap();

    let fresh = RouteGuard::open(&path).unwrap();
    for (from, to) in [("LIS", "MAD"), ("MAD", "LIS")] {
        let route = fresh.best_route(from, to);
        assert_eq!(route.path, nodes(&[from, to]));
        assert_eq!(route.cost, Cost::Finite(12));
    }
}

#[test]
fn queries_run_while_registrations_happen() {
    let (_dir, _path, guard) = setup();
    let guard = std::sync::Arc::new(guard);

    let writer = {
        let guard = std::sync::Arc::clone(&guard);
        std::thread::spawn(move || {
            for i in 0..20 {
                guard.register(&format!("X{i}"), "GRU", 100 + i).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let guard = std::sync::Arc::clone(&guard);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let route = guard.best_route("GRU", "CDG");
                    assert_eq!(route.cost, Cost::Finite(40));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(guard.snapshot().record_count(), 27);
}
