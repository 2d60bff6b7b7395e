// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid index synchronization and the router's view of the scene.

use gridwire_index::{Footprint, GridIndex};
use gridwire_router::RouteGrid;
use kurbo::Point;

use crate::SceneError;
use crate::scene::{EntityKind, Scene};
use crate::types::{CellBounds, EntityId};

/// The scene grid as seen by the wire router.
///
/// A cell is walkable when it lies inside the configured route bounds (if
/// any) and no registered node occupies it. Paths pass through cell centers.
#[derive(Clone, Copy, Debug)]
pub struct SceneGrid<'a> {
    index: &'a GridIndex<EntityId>,
    bounds: Option<CellBounds>,
}

impl RouteGrid for SceneGrid<'_> {
    fn world_to_grid(&self, p: Point) -> (i32, i32) {
        self.index.cell_of(p.x, p.y)
    }

    fn grid_to_world(&self, col: i32, row: i32) -> Point {
        let (x, y) = self.index.cell_center(col, row);
        Point::new(x, y)
    }

    fn is_walkable(&self, col: i32, row: i32) -> bool {
        self.bounds.is_none_or(|b| b.contains(col, row)) && !self.index.is_cell_occupied(col, row)
    }
}

impl Scene {
    /// The router's view of this scene.
    pub fn route_grid(&self) -> SceneGrid<'_> {
        SceneGrid {
            index: &self.grid,
            bounds: self.config.route_bounds,
        }
    }

    /// Register a node's footprint in the grid index at its current position.
    ///
    /// Registering again at the same base cell is a no-op. Returns whether
    /// any grid cell changed.
    pub fn update_grid(&mut self, id: EntityId) -> Result<bool, SceneError> {
        let entity = self.get(id).ok_or(SceneError::StaleEntity(id))?;
        let EntityKind::Node(node) = &entity.kind else {
            return Err(SceneError::NotANode(id));
        };
        let footprint = Footprint::new(entity.pos.x, entity.pos.y, node.template.span());
        let changed = self.grid.register(id, footprint);
        if changed {
            tracing::debug!(?id, cells = ?self.grid.cells_of(id), "node registered");
        }
        Ok(changed)
    }

    /// Register a freshly created node. Callers guarantee `id` is a live node.
    pub(crate) fn register_footprint(&mut self, id: EntityId) {
        if let Err(err) = self.update_grid(id) {
            tracing::warn!(%err, "could not register footprint");
        }
    }

    /// Remove an entity from the grid index. Returns `false` if it was not
    /// registered.
    pub fn unregister(&mut self, id: EntityId) -> bool {
        let removed = self.grid.unregister(id);
        if removed {
            tracing::debug!(?id, "node unregistered");
        }
        removed
    }

    /// Whether another registered node shares any of `id`'s cells.
    pub fn is_occupied(&self, id: EntityId) -> bool {
        self.grid.is_occupied(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GateKind;
    use crate::types::SceneConfig;
    use gridwire_index::CellKey;

    #[test]
    fn placed_nodes_occupy_their_span() {
        let mut scene = Scene::new();
        let and = scene.place_node(GateKind::And.template(), Point::new(75.0, 75.0));
        assert_eq!(scene.grid().cells_of(and).len(), 9);
        assert_eq!(scene.grid().occupants(0, 0), &[and]);
        assert_eq!(scene.grid().occupants(2, 2), &[and]);
        assert!(!scene.grid().is_cell_occupied(3, 0));
        assert!(!scene.is_occupied(and));
    }

    #[test]
    fn moving_and_updating_leaves_no_stale_buckets() {
        let mut scene = Scene::new();
        let not = scene.place_node(GateKind::Not.template(), Point::new(75.0, 25.0));
        let before: alloc::vec::Vec<CellKey> = scene.grid().cells_of(not).to_vec();

        scene.set_position(not, Point::new(475.0, 325.0)).unwrap();
        assert_ne!(scene.grid().cells_of(not), before.as_slice());
        assert_eq!(scene.update_grid(not), Ok(false), "already at its new cells");

        for key in before {
            let (c, r) = key.unpack();
            assert!(!scene.grid().is_cell_occupied(c, r));
        }
        assert_eq!(scene.grid().cell_count(), 3);
        assert_eq!(scene.grid().occupants(9, 6), &[not]);
    }

    #[test]
    fn moving_an_unplaced_node_leaves_the_grid_alone() {
        let mut scene = Scene::new();
        let loose = scene.create_node(GateKind::Not.template(), Point::new(75.0, 25.0));
        scene.set_position(loose, Point::new(275.0, 25.0)).unwrap();
        assert!(!scene.grid().contains(loose));
        assert_eq!(scene.grid().cell_count(), 0);
    }

    #[test]
    fn overlapping_nodes_are_occupied_both_ways() {
        let mut scene = Scene::new();
        let a = scene.place_node(GateKind::And.template(), Point::new(75.0, 75.0));
        let b = scene.place_node(GateKind::Not.template(), Point::new(175.0, 125.0));
        assert!(scene.is_occupied(a));
        assert!(scene.is_occupied(b));
        scene.set_position(b, Point::new(375.0, 125.0)).unwrap();
        scene.update_grid(b).unwrap();
        assert!(!scene.is_occupied(a));
        assert!(!scene.is_occupied(b));
    }

    #[test]
    fn only_nodes_are_registered() {
        let mut scene = Scene::new();
        let group = scene.create_group(Point::ZERO);
        assert_eq!(scene.update_grid(group), Err(SceneError::NotANode(group)));
        scene.destroy(group);
        assert_eq!(scene.update_grid(group), Err(SceneError::StaleEntity(group)));
        assert!(!scene.unregister(group));
    }

    #[test]
    fn route_grid_respects_bounds_and_occupants() {
        let mut scene = Scene::with_config(SceneConfig {
            route_bounds: Some(CellBounds::new((0, 0), (9, 9))),
            ..SceneConfig::default()
        });
        scene.place_node(GateKind::Not.template(), Point::new(275.0, 275.0));
        let grid = scene.route_grid();
        assert!(grid.is_walkable(0, 0));
        assert!(!grid.is_walkable(-1, 0));
        assert!(!grid.is_walkable(5, 5));
        assert!(grid.is_walkable(7, 5));
        assert_eq!(grid.world_to_grid(Point::new(-6.25, 25.0)), (-1, 0));
        assert_eq!(grid.grid_to_world(2, 0), Point::new(125.0, 25.0));
    }
}
