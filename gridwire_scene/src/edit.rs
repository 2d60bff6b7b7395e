// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editing helpers driven by world-space pointer input.
//!
//! These hold the transient state of the selection, drag, and wire tools.
//! Event wiring and tool switching stay with the caller.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_4;

use gridwire_hit::Aabb;
use gridwire_index::cell_coord;
use kurbo::{Point, Vec2};

use crate::SceneError;
use crate::node::snap_node_position;
use crate::scene::Scene;
use crate::types::{EntityFlags, EntityId};

/// Selected entities and the rubber band that picks them.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<EntityId>,
    bounds: Option<Aabb>,
    area: Option<(Point, Point)>,
    hidden_wires: Vec<EntityId>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected entities.
    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains(&id)
    }

    /// Union of the selected entities' bounding boxes.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// The rubber band being dragged out, if any.
    pub fn area(&self) -> Option<Aabb> {
        self.area.map(|(a, b)| Aabb::from_corners(a, b))
    }

    /// Deselect everything.
    ///
    /// Wires hidden by [`Selection::drag`] stay hidden; finish the drag with
    /// [`Selection::drop`] or [`Selection::cancel_drag`] first.
    pub fn clear(&mut self) {
        self.items.clear();
        self.bounds = None;
        self.area = None;
    }

    /// Select a single entity, replacing the selection.
    pub fn select(&mut self, scene: &Scene, id: EntityId) -> bool {
        self.clear();
        let Some(entity) = scene.get(id) else {
            return false;
        };
        self.bounds = Some(entity.bounding());
        self.items.push(id);
        true
    }

    /// Start a rubber band at `p`, clearing the selection.
    pub fn begin_area(&mut self, p: Point) {
        self.clear();
        self.area = Some((p, p));
    }

    /// Move the free corner of the rubber band.
    pub fn extend_area(&mut self, p: Point) {
        if let Some((_, end)) = &mut self.area {
            *end = p;
        }
    }

    /// Select every entity whose bounding box lies inside the rubber band.
    ///
    /// Returns the union of the selected bounding boxes, or `None` if nothing
    /// was selected or no band was started.
    pub fn finish_area(&mut self, scene: &Scene) -> Option<Aabb> {
        let area = self.area()?;
        self.area = None;
        self.items = scene.within(area);
        self.bounds = union_of(scene, &self.items);
        self.bounds
    }

    /// Selected entities that are live nodes.
    fn nodes(&self, scene: &Scene) -> Vec<EntityId> {
        self.items
            .iter()
            .copied()
            .filter(|&id| scene.get(id).and_then(|e| e.as_node()).is_some())
            .collect()
    }

    /// Move the selected nodes by `delta`.
    ///
    /// Wires attached to moving nodes are hidden, and not rerouted, until
    /// [`Selection::drop`] or [`Selection::cancel_drag`].
    pub fn drag(&mut self, scene: &mut Scene, delta: Vec2) -> Result<(), SceneError> {
        for node in self.nodes(scene) {
            for wire in scene.connected_wires(node) {
                if self.hidden_wires.contains(&wire) {
                    continue;
                }
                if let Some(flags) = scene.get(wire).map(|e| e.flags()) {
                    scene.set_flags(wire, flags - EntityFlags::VISIBLE);
                    self.hidden_wires.push(wire);
                }
            }
            scene.translate(node, delta)?;
        }
        self.bounds = self.bounds.map(|b| b.translate(delta.x, delta.y));
        Ok(())
    }

    /// Finish a drag: snap the selected nodes to the grid, register them at
    /// their new cells, show their wires again, and run the layout pass.
    ///
    /// Returns the nodes that landed on cells another node occupies.
    pub fn drop(&mut self, scene: &mut Scene) -> Result<Vec<EntityId>, SceneError> {
        let nodes = self.nodes(scene);
        for &node in &nodes {
            let entity = scene.get(node).ok_or(SceneError::StaleEntity(node))?;
            let span = entity
                .as_node()
                .ok_or(SceneError::NotANode(node))?
                .template()
                .span();
            let snapped = snap_node_position(entity.pos(), span, scene.config().cell_size);
            scene.set_position(node, snapped)?;
            scene.update_grid(node)?;
        }
        self.show_wires(scene);
        scene.update_layout();
        self.items.retain(|&id| scene.is_alive(id));
        self.bounds = union_of(scene, &self.items);
        Ok(nodes.into_iter().filter(|&n| scene.is_occupied(n)).collect())
    }

    /// Abandon a drag where the nodes are, without snapping.
    ///
    /// Hidden wires are shown again and rerouted on the next
    /// [`Scene::update_layout`].
    pub fn cancel_drag(&mut self, scene: &mut Scene) {
        self.show_wires(scene);
    }

    /// Whether a drag is hiding wires.
    pub fn is_dragging(&self) -> bool {
        !self.hidden_wires.is_empty()
    }

    fn show_wires(&mut self, scene: &mut Scene) {
        for wire in self.hidden_wires.drain(..) {
            if let Some(flags) = scene.get(wire).map(|e| e.flags()) {
                scene.set_flags(wire, flags | EntityFlags::VISIBLE);
            }
        }
    }
}

fn union_of(scene: &Scene, items: &[EntityId]) -> Option<Aabb> {
    Aabb::union_all(
        items
            .iter()
            .filter_map(|&id| scene.get(id))
            .map(|e| e.bounding()),
    )
}

/// A wire being drawn out of a connector.
///
/// The draft path starts at the connector anchor; its last point follows the
/// pointer, locked to the dominant axis and snapped to cell centers.
#[derive(Clone, Debug)]
pub struct WireDraft {
    node: EntityId,
    connector: &'static str,
    path: Vec<Point>,
}

impl WireDraft {
    /// Start a wire at a node connector.
    pub fn begin(scene: &Scene, node: EntityId, connector: &str) -> Result<Self, SceneError> {
        let end = scene.connector_end(node, connector)?;
        Ok(Self {
            node,
            connector: end.connector,
            path: vec![end.anchor, end.anchor],
        })
    }

    /// The node and connector the draft starts at.
    pub fn start(&self) -> (EntityId, &'static str) {
        (self.node, self.connector)
    }

    /// The draft path, for preview rendering.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Follow the pointer with the last point.
    ///
    /// Measured from the previous point, a pointer within 45° of the
    /// horizontal keeps the previous point's y, and one within 45° of the
    /// vertical keeps its x. Exact diagonals are left free. The result is
    /// snapped to the center of its cell.
    pub fn move_last_point(&mut self, p: Point, cell_size: f64) {
        let [.., prev, last] = self.path.as_mut_slice() else {
            return;
        };
        let angle = (p - *prev).atan2();
        let range = FRAC_PI_4;
        let mut target = p;
        if (-range < angle && angle < range) || angle < -3.0 * range || angle > 3.0 * range {
            target.y = prev.y;
        }
        if (range < angle && angle < 3.0 * range) || (-3.0 * range < angle && angle < -range) {
            target.x = prev.x;
        }
        let center = |v: f64| f64::from(cell_coord(v, cell_size)) * cell_size + cell_size / 2.0;
        *last = Point::new(center(target.x), center(target.y));
    }

    /// Finish the draft at another connector, creating and routing the wire.
    pub fn finish(
        self,
        scene: &mut Scene,
        node: EntityId,
        connector: &str,
    ) -> Result<EntityId, SceneError> {
        scene.connect((self.node, self.connector), (node, connector))
    }
}
