// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire entity data.

use alloc::vec::Vec;

use gridwire_hit::Aabb;
use kurbo::Point;

use crate::types::EntityId;

/// One end of a wire: the node connector it is attached to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WireEnd {
    /// The node.
    pub node: EntityId,
    /// Connector name on the node.
    pub connector: &'static str,
    /// World-space anchor of the connector, refreshed when the node moves.
    pub anchor: Point,
}

/// Where a wire's path stands relative to its anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteState {
    /// Anchors changed since the path was computed.
    Stale,
    /// The path was routed around registered nodes.
    Routed,
    /// The router found no path; the wire is a straight segment between its
    /// anchors.
    Unrouted,
}

/// Wire-specific entity data.
#[derive(Clone, Debug)]
pub struct WireData {
    pub(crate) start: WireEnd,
    pub(crate) end: WireEnd,
    pub(crate) path: Vec<Point>,
    pub(crate) thickness: f64,
    pub(crate) route: RouteState,
}

impl WireData {
    pub(crate) fn new(start: WireEnd, end: WireEnd, thickness: f64) -> Self {
        Self {
            start,
            end,
            path: Vec::new(),
            thickness,
            route: RouteState::Stale,
        }
    }

    /// Start of the wire.
    pub fn start(&self) -> &WireEnd {
        &self.start
    }

    /// End of the wire.
    pub fn end(&self) -> &WireEnd {
        &self.end
    }

    /// Waypoints, from the start anchor to the end anchor.
    ///
    /// Empty until the wire has been routed once.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Stroke thickness.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Route state.
    pub fn route(&self) -> RouteState {
        self.route
    }

    pub(crate) fn end_mut(&mut self, node: EntityId, connector: &str) -> Option<&mut WireEnd> {
        if self.start.node == node && self.start.connector == connector {
            Some(&mut self.start)
        } else if self.end.node == node && self.end.connector == connector {
            Some(&mut self.end)
        } else {
            None
        }
    }

    /// Waypoint bounding box padded by half the thickness.
    pub(crate) fn bounding(&self) -> Option<Aabb> {
        let pad = self.thickness / 2.0;
        Aabb::union_all(self.path.iter().map(|&p| Aabb::at(p))).map(|b| b.inflate(pad, pad))
    }
}
