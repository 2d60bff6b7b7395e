// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking, rubber-band selection, dragging, and drawing a wire.
//!
//! This example drives the `gridwire_scene::edit` helpers with a scripted
//! sequence of world-space pointer positions, the way an editor's tools would.
//! Picking uses a small stroke tolerance so wires are easier to grab.
//!
//! Run:
//! - `cargo run -p gridwire_demos --example pick_and_drag`

use gridwire_hit::{HitKind, HitParams};
use gridwire_scene::edit::{Selection, WireDraft};
use gridwire_scene::{GateKind, NodePart, Scene, SceneConfig};
use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut scene = Scene::with_config(SceneConfig {
        hit_params: HitParams {
            stroke_tolerance: 4.0,
            ..HitParams::default()
        },
        ..SceneConfig::default()
    });
    let and = scene.place_node(GateKind::And.template(), Point::new(75.0, 75.0));
    let or = scene.place_node(GateKind::Or.template(), Point::new(425.0, 75.0));
    let not = scene.place_node(GateKind::Not.template(), Point::new(425.0, 325.0));
    scene.update_layout();

    // Pointer down on the AND gate's output tab starts a wire.
    let press = Point::new(155.0, 80.0);
    let hit = scene.pick(press).expect("the AND gate is under the pointer");
    let Ok(Some(NodePart::Connector { name, anchor })) = scene.node_part_at(hit, press) else {
        panic!("expected a connector under {press:?}");
    };
    println!("pressed {name} of {hit:?} at {anchor:?}");

    let mut draft = WireDraft::begin(&scene, hit, name).expect("connector exists");
    for p in [Point::new(240.0, 90.0), Point::new(260.0, 20.0), Point::new(330.0, 30.0)] {
        draft.move_last_point(p, scene.config().cell_size);
        println!("  draft end follows to {:?}", draft.path().last());
    }

    // Pointer up on the OR gate's input.
    let release = Point::new(345.0, 75.0);
    let target = scene.pick(release).expect("the OR gate is under the pointer");
    let Ok(Some(NodePart::Connector { name, .. })) = scene.node_part_at(target, release) else {
        panic!("expected a connector under {release:?}");
    };
    let wire = draft.finish(&mut scene, target, name).expect("wire connects");
    scene.update_layout();
    println!(
        "wire {wire:?}: {:?}",
        scene.get(wire).and_then(|e| e.as_wire()).map(|w| w.path())
    );

    // Just beside the wire: only the stroke tolerance makes it a hit.
    let path = scene
        .get(wire)
        .and_then(|e| e.as_wire())
        .map(|w| w.path().to_vec())
        .unwrap_or_default();
    if let [first, second, ..] = path.as_slice() {
        let offset = if first.y == second.y {
            Vec2::new(0.0, 9.0)
        } else {
            Vec2::new(9.0, 0.0)
        };
        let near = first.midpoint(*second) + offset;
        println!("hits beside the wire at {near:?}:");
        for (id, score) in scene.hits(near) {
            let what = match score.kind {
                HitKind::Fill => "body",
                HitKind::Stroke => "stroke",
            };
            println!("  {id:?}: {what} at {:.2}", score.distance);
        }
    }

    // Rubber-band the OR gate and drag it down onto the NOT gate.
    let mut selection = Selection::new();
    selection.begin_area(Point::new(300.0, -50.0));
    selection.extend_area(Point::new(550.0, 200.0));
    println!("selected bounds: {:?}", selection.finish_area(&scene));
    println!("selected: {:?}", selection.items());

    for _ in 0..5 {
        selection
            .drag(&mut scene, Vec2::new(0.0, 40.0))
            .expect("selection is alive");
        scene.update_layout();
    }
    let overlapping = selection.drop(&mut scene).expect("selection is alive");
    println!("dropped; overlapping nodes: {overlapping:?}");

    // Move it somewhere free instead.
    selection
        .drag(&mut scene, Vec2::new(200.0, 0.0))
        .expect("selection is alive");
    let overlapping = selection.drop(&mut scene).expect("selection is alive");
    println!("dropped again; overlapping nodes: {overlapping:?}");
    println!(
        "rerouted wire: {:?}",
        scene.get(wire).and_then(|e| e.as_wire()).map(|w| w.path())
    );
    println!("and {and:?} / not {not:?} untouched");
}
