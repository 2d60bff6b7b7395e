// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connectors, wire creation, and rerouting.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use gridwire_router::simplify_path;
use kurbo::Point;
use smallvec::SmallVec;

use crate::SceneError;
use crate::node::{NodeGeometry, NodePart, WireLink};
use crate::scene::{EntityKind, Scene};
use crate::types::{EntityFlags, EntityId};
use crate::wire::{RouteState, WireData, WireEnd};

impl Scene {
    /// World-space geometry of a node.
    pub fn node_geometry(&self, node: EntityId) -> Result<NodeGeometry, SceneError> {
        let entity = self.get(node).ok_or(SceneError::StaleEntity(node))?;
        let data = entity.as_node().ok_or(SceneError::NotANode(node))?;
        Ok(NodeGeometry::new(
            data.template,
            entity.pos,
            self.config.cell_size,
        ))
    }

    /// Which part of a node `p` falls on, if any.
    pub fn node_part_at(&self, node: EntityId, p: Point) -> Result<Option<NodePart>, SceneError> {
        let geometry = self.node_geometry(node)?;
        let template = self.entity(node).as_node().map(|n| n.template);
        Ok(template.and_then(|t| geometry.part_at(t, p)))
    }

    /// Resolve a connector by name into a wire end at its current anchor.
    pub fn connector_end(&self, node: EntityId, connector: &str) -> Result<WireEnd, SceneError> {
        let geometry = self.node_geometry(node)?;
        let template = self
            .entity(node)
            .as_node()
            .ok_or(SceneError::NotANode(node))?
            .template;
        let c = template
            .connector(connector)
            .ok_or_else(|| SceneError::UnknownConnector {
                node,
                name: connector.to_string(),
            })?;
        Ok(WireEnd {
            node,
            connector: c.name,
            anchor: geometry.anchor(c.side, c.slot),
        })
    }

    /// Connect two node connectors with a new wire and route it.
    ///
    /// The wire is attached under the root and laid out immediately. If no
    /// route is found it falls back to a straight segment between the anchors
    /// (see [`RouteState::Unrouted`]).
    pub fn connect(
        &mut self,
        start: (EntityId, &str),
        end: (EntityId, &str),
    ) -> Result<EntityId, SceneError> {
        let start = self.connector_end(start.0, start.1)?;
        let end = self.connector_end(end.0, end.1)?;
        let wire = self.insert_wire(WireData::new(start, end, self.config.wire_thickness));
        for e in [start, end] {
            if let Some(EntityKind::Node(node)) = self.entity_mut(e.node).map(|n| &mut n.kind) {
                node.wires.push(WireLink {
                    connector: e.connector,
                    wire,
                });
            }
        }
        let root = self.root();
        self.add_child(root, wire);
        self.reroute(wire);
        self.update_entity_layout(wire);
        tracing::debug!(
            ?wire,
            from = ?(start.node, start.connector),
            to = ?(end.node, end.connector),
            "wire connected"
        );
        Ok(wire)
    }

    /// Wires attached to a node, without duplicates.
    pub fn connected_wires(&self, node: EntityId) -> Vec<EntityId> {
        let Some(data) = self.get(node).and_then(|e| e.as_node()) else {
            return Vec::new();
        };
        let mut out: Vec<EntityId> = Vec::with_capacity(data.wires.len());
        for link in &data.wires {
            if !out.contains(&link.wire) {
                out.push(link.wire);
            }
        }
        out
    }

    /// Recompute a wire's path from its anchors.
    ///
    /// The path is the start anchor, the routed cell centers, then the end
    /// anchor, simplified to its corners. Returns the new route state, or
    /// `None` if `wire` is not a live wire.
    pub fn reroute(&mut self, wire: EntityId) -> Option<RouteState> {
        let data = self.get(wire)?.as_wire()?;
        let (a, b) = (data.start.anchor, data.end.anchor);

        let cells = self.router.route(&self.route_grid(), a, b);
        let (path, state) = if cells.is_empty() {
            (vec![a, b], RouteState::Unrouted)
        } else {
            let mut full = Vec::with_capacity(cells.len() + 2);
            full.push(a);
            full.extend(cells);
            full.push(b);
            (simplify_path(&full), RouteState::Routed)
        };
        tracing::debug!(?wire, points = path.len(), ?state, "wire rerouted");

        if let Some(EntityKind::Wire(data)) = self.entity_mut(wire).map(|e| &mut e.kind) {
            data.path = path;
            data.route = state;
        }
        self.mark_dirty(wire);
        Some(state)
    }

    /// Reroute every visible wire whose route is stale. Hidden wires keep
    /// their stale route until they are shown again.
    pub(crate) fn reroute_stale(&mut self) -> usize {
        let roots: Vec<EntityId> = self.arena_roots().map(|e| e.id).collect();
        let stale: Vec<EntityId> = roots
            .into_iter()
            .flat_map(|root| self.collect(root, |_| true))
            .filter(|&id| {
                let entity = self.entity(id);
                entity.flags.contains(EntityFlags::VISIBLE)
                    && entity
                        .as_wire()
                        .is_some_and(|w| w.route == RouteState::Stale)
            })
            .collect();
        for &wire in &stale {
            self.reroute(wire);
        }
        stale.len()
    }

    /// After a node moved: move the wire ends attached to it and mark their
    /// routes stale.
    pub(crate) fn refresh_wire_anchors(&mut self, node: EntityId) {
        let Ok(geometry) = self.node_geometry(node) else {
            return;
        };
        let Some(data) = self.entity(node).as_node() else {
            return;
        };
        let template = data.template;
        let links: SmallVec<[WireLink; 4]> = data.wires.clone();

        for link in links {
            let Some(c) = template.connector(link.connector) else {
                continue;
            };
            let anchor = geometry.anchor(c.side, c.slot);
            let Some(entity) = self.entity_mut(link.wire) else {
                continue;
            };
            if let EntityKind::Wire(wire) = &mut entity.kind
                && let Some(end) = wire.end_mut(node, link.connector)
            {
                end.anchor = anchor;
                wire.route = RouteState::Stale;
                entity.pos = wire.start.anchor;
            }
            self.mark_dirty(link.wire);
        }
    }
}
