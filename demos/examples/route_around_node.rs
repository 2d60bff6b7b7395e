// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire routing around placed nodes.
//!
//! This example shows how:
//! - `gridwire_scene` places gates on the grid and connects them,
//! - `gridwire_router` detours wires around registered nodes,
//! - `gridwire_index` tracks which cells each node covers,
//! - moving a node moves its cells and marks its wires stale until the next
//!   layout pass,
//! - an unreachable end degrades to a straight, unrouted wire.
//!
//! Run:
//! - `cargo run -p gridwire_demos --example route_around_node`
//! - `RUST_LOG=debug cargo run -p gridwire_demos --example route_around_node` for router logs

use gridwire_index::CellKey;
use gridwire_router::{CellGrid, Router, simplify_path};
use gridwire_scene::{EntityId, GateKind, Scene};
use kurbo::Point;
use tracing_subscriber::EnvFilter;

fn describe(scene: &Scene, wire: EntityId) {
    let Some(data) = scene.get(wire).and_then(|e| e.as_wire()) else {
        println!("  {wire:?} is gone");
        return;
    };
    println!("  {:?}, {} points:", data.route(), data.path().len());
    for p in data.path() {
        println!("    ({:.2}, {:.2})", p.x, p.y);
    }
}

fn cells(scene: &Scene, node: EntityId) -> Vec<(i32, i32)> {
    scene
        .grid()
        .cells_of(node)
        .iter()
        .map(|key: &CellKey| key.unpack())
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut scene = Scene::new();
    let not = GateKind::Not.template();
    let source = scene.place_node(not, Point::new(75.0, 25.0));
    let sink = scene.place_node(not, Point::new(575.0, 25.0));

    println!("Straight run between two inverters:");
    let wire = scene
        .connect((source, "B"), (sink, "A"))
        .expect("both connectors exist");
    scene.update_layout();
    describe(&scene, wire);

    println!("\nA gate dropped in between; the wire detours:");
    let blocker = scene.place_node(GateKind::And.template(), Point::new(325.0, 25.0));
    println!("  blocker covers {:?}", cells(&scene, blocker));
    let crowd = scene.grid().query_rect((150.0, 0.0), (450.0, 49.0));
    println!("  nodes along the first row between the gates: {crowd:?}");
    scene.reroute(wire);
    scene.update_layout();
    describe(&scene, wire);

    println!("\nThe sink moves down two rows:");
    scene
        .set_position(sink, Point::new(575.0, 125.0))
        .expect("sink is alive");
    println!("  sink now covers {:?}", cells(&scene, sink));
    scene.update_layout();
    describe(&scene, wire);

    println!("\nThe blocker is removed:");
    scene.destroy(blocker);
    scene.reroute(wire);
    scene.update_layout();
    describe(&scene, wire);

    // The router on its own, over a walled-in target: the watchdog gives up.
    println!("\nRouting into a sealed pocket on an unbounded grid:");
    let pocket = CellGrid::new(50.0, |c, r| {
        !((4..=6).contains(&c) && (4..=6).contains(&r) && (c, r) != (5, 5))
    });
    let router = Router::with_max_iterations(2000);
    let path = router.route(&pocket, Point::new(25.0, 25.0), Point::new(275.0, 275.0));
    println!("  {} points (empty means no route)", simplify_path(&path).len());
}
