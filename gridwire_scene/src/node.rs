// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node templates, connector layout, and node geometry.

use gridwire_index::{Span, cell_coord};
use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::types::EntityId;

/// The side of a node a connector sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left edge; slots run top to bottom.
    Left,
    /// Top edge; slots run left to right.
    Top,
    /// Right edge; slots run top to bottom.
    Right,
    /// Bottom edge; slots run left to right.
    Bottom,
}

/// A named connection point on a node edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connector {
    /// Name, unique within its template.
    pub name: &'static str,
    /// Edge the connector sits on.
    pub side: Side,
    /// Cell slot along that edge, counted from the top or left.
    pub slot: u16,
}

impl Connector {
    /// Create a connector.
    pub const fn new(name: &'static str, side: Side, slot: u16) -> Self {
        Self { name, side, slot }
    }
}

/// Static description of a node kind: its span in cells and its connectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
    /// Display name of the kind.
    pub name: &'static str,
    /// Width in cells.
    pub cols: u16,
    /// Height in cells.
    pub rows: u16,
    /// Connector table.
    pub connectors: &'static [Connector],
}

impl NodeTemplate {
    /// The footprint span of nodes of this kind.
    pub const fn span(&self) -> Span {
        Span::new(self.cols, self.rows)
    }

    /// Look up a connector by name.
    pub fn connector(&self, name: &str) -> Option<&'static Connector> {
        self.connectors.iter().find(|c| c.name == name)
    }

    /// Look up the connector occupying a side slot.
    pub fn connector_at(&self, side: Side, slot: u16) -> Option<&'static Connector> {
        self.connectors
            .iter()
            .find(|c| c.side == side && c.slot == slot)
    }
}

/// Two inputs on the left, one output in the middle of the right edge.
pub static AND: NodeTemplate = NodeTemplate {
    name: "AND",
    cols: 3,
    rows: 3,
    connectors: &[
        Connector::new("A", Side::Left, 0),
        Connector::new("B", Side::Left, 2),
        Connector::new("C", Side::Right, 1),
    ],
};

/// One input on the left, two outputs on the right.
pub static OR: NodeTemplate = NodeTemplate {
    name: "OR",
    cols: 3,
    rows: 3,
    connectors: &[
        Connector::new("A", Side::Left, 1),
        Connector::new("B", Side::Right, 0),
        Connector::new("C", Side::Right, 2),
    ],
};

/// A single-row inverter.
pub static NOT: NodeTemplate = NodeTemplate {
    name: "NOT",
    cols: 3,
    rows: 1,
    connectors: &[
        Connector::new("A", Side::Left, 0),
        Connector::new("B", Side::Right, 0),
    ],
};

/// Built-in gate kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// See [`AND`].
    And,
    /// See [`OR`].
    Or,
    /// See [`NOT`].
    Not,
}

impl GateKind {
    /// The static template for this gate.
    pub fn template(self) -> &'static NodeTemplate {
        match self {
            Self::And => &AND,
            Self::Or => &OR,
            Self::Not => &NOT,
        }
    }
}

/// A wire attached to one of a node's connectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireLink {
    /// Connector name on the node.
    pub connector: &'static str,
    /// The attached wire.
    pub wire: EntityId,
}

/// Node-specific entity data.
#[derive(Clone, Debug)]
pub struct NodeData {
    pub(crate) template: &'static NodeTemplate,
    pub(crate) wires: SmallVec<[WireLink; 4]>,
}

impl NodeData {
    pub(crate) fn new(template: &'static NodeTemplate) -> Self {
        Self {
            template,
            wires: SmallVec::new(),
        }
    }

    /// The node's template.
    pub fn template(&self) -> &'static NodeTemplate {
        self.template
    }

    /// Wires attached to this node, in attachment order.
    pub fn wires(&self) -> &[WireLink] {
        &self.wires
    }
}

/// What part of a node a point falls on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodePart {
    /// Strictly inside the body.
    Body,
    /// On a connector tab.
    Connector {
        /// Connector name.
        name: &'static str,
        /// World-space anchor wires attach to.
        anchor: Point,
    },
}

/// Resolved world-space geometry of a node.
///
/// The body covers `cols × rows` cells. Connector tabs stick out of the body
/// by `connector_depth` on every side, which makes up the outer size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    /// Center of the node.
    pub pos: Point,
    /// Size of the body.
    pub body: Size,
    /// Size including the connector band.
    pub outer: Size,
    /// Length of a connector tab along its edge.
    pub connector_width: f64,
    /// Depth of a connector tab across its edge.
    pub connector_depth: f64,
}

impl NodeGeometry {
    /// Geometry of a node of `template` centered on `pos`.
    pub fn new(template: &NodeTemplate, pos: Point, cell_size: f64) -> Self {
        let connector_width = cell_size / 2.0;
        let connector_depth = cell_size / 4.0;
        let body = Size::new(
            f64::from(template.cols) * cell_size,
            f64::from(template.rows) * cell_size,
        );
        Self {
            pos,
            body,
            outer: Size::new(
                body.width + 2.0 * connector_depth,
                body.height + 2.0 * connector_depth,
            ),
            connector_width,
            connector_depth,
        }
    }

    /// Anchor point of the connector in `slot` on `side`.
    ///
    /// Anchors sit in the middle of their tab, so they lie just outside the
    /// body and on the center line of the slot's cell.
    pub fn anchor(&self, side: Side, slot: u16) -> Point {
        let cw = self.connector_width;
        let ch = self.connector_depth;
        let left = self.pos.x - self.outer.width / 2.0;
        let top = self.pos.y - self.outer.height / 2.0;
        let along = f64::from(2 * u32::from(slot) + 1) * cw + cw / 2.0;
        match side {
            Side::Left => Point::new(left + ch / 2.0, top + along),
            Side::Right => Point::new(self.pos.x + self.outer.width / 2.0 - ch / 2.0, top + along),
            Side::Top => Point::new(left + along, top + ch / 2.0),
            Side::Bottom => Point::new(left + along, self.pos.y + self.outer.height / 2.0 - ch / 2.0),
        }
    }

    /// Resolve which part of a node of `template` the point `p` is on.
    ///
    /// Points on the body edge or in a corner of the connector band belong to
    /// neither the body nor a connector.
    pub fn part_at(&self, template: &NodeTemplate, p: Point) -> Option<NodePart> {
        let v = p - self.pos;
        let (ax, ay) = (v.x.abs(), v.y.abs());
        let (bw, bh) = (self.body.width / 2.0, self.body.height / 2.0);
        let (ow, oh) = (self.outer.width / 2.0, self.outer.height / 2.0);

        if ax < bw && ay < bh {
            return Some(NodePart::Body);
        }

        let in_side_band = bw < ax && ax < ow;
        let in_end_band = bh < ay && ay < oh;

        let (side, slot) = if in_side_band {
            let side = if v.x < 0.0 { Side::Left } else { Side::Right };
            (side, self.slot_at(v.y + oh, template.rows)?)
        } else if in_end_band {
            let side = if v.y < 0.0 { Side::Top } else { Side::Bottom };
            (side, self.slot_at(v.x + ow, template.cols)?)
        } else {
            return None;
        };

        let connector = template.connector_at(side, slot)?;
        Some(NodePart::Connector {
            name: connector.name,
            anchor: self.anchor(side, slot),
        })
    }

    /// Slot under an offset measured from the outer edge. Tabs occupy the odd
    /// connector-width stripes; even stripes are gaps between tabs.
    fn slot_at(&self, offset: f64, slots: u16) -> Option<u16> {
        let stripe = cell_coord(offset, self.connector_width);
        if stripe % 2 == 0 {
            return None;
        }
        let slot = (stripe - 1) / 2;
        u16::try_from(slot).ok().filter(|&s| s < slots)
    }
}

/// Snap a requested node center to the grid.
///
/// The point is floored to a cell corner; axes with an odd span are then
/// shifted by half a cell so the node centers on a cell, while even spans
/// center on a grid line.
pub fn snap_node_position(at: Point, span: Span, cell_size: f64) -> Point {
    let snap = |v: f64, cells: u16| {
        let base = f64::from(cell_coord(v, cell_size)) * cell_size;
        if cells % 2 == 1 {
            base + cell_size / 2.0
        } else {
            base
        }
    };
    Point::new(snap(at.x, span.cols), snap(at.y, span.rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f64 = 50.0;

    #[test]
    fn gate_templates_resolve() {
        assert_eq!(GateKind::And.template().name, "AND");
        assert_eq!(GateKind::Not.template().span(), Span::new(3, 1));
        let or = GateKind::Or.template();
        assert_eq!(or.connector("A"), Some(&Connector::new("A", Side::Left, 1)));
        assert_eq!(or.connector_at(Side::Right, 2).map(|c| c.name), Some("C"));
        assert!(or.connector("Z").is_none());
        assert!(or.connector_at(Side::Top, 0).is_none());
    }

    #[test]
    fn sizes_include_connector_band() {
        let g = NodeGeometry::new(&AND, Point::new(75.0, 75.0), CELL);
        assert_eq!(g.body, Size::new(150.0, 150.0));
        assert_eq!(g.outer, Size::new(175.0, 175.0));
        assert_eq!(g.connector_width, 25.0);
        assert_eq!(g.connector_depth, 12.5);
    }

    #[test]
    fn anchors_sit_on_slot_center_lines() {
        // AND body covers cells (0..3, 0..3).
        let g = NodeGeometry::new(&AND, Point::new(75.0, 75.0), CELL);
        assert_eq!(g.anchor(Side::Left, 0), Point::new(-6.25, 25.0));
        assert_eq!(g.anchor(Side::Left, 2), Point::new(-6.25, 125.0));
        assert_eq!(g.anchor(Side::Right, 1), Point::new(156.25, 75.0));
        assert_eq!(g.anchor(Side::Top, 0), Point::new(25.0, -6.25));
        assert_eq!(g.anchor(Side::Bottom, 2), Point::new(125.0, 156.25));
    }

    #[test]
    fn part_at_resolves_body_and_connectors() {
        let g = NodeGeometry::new(&AND, Point::new(75.0, 75.0), CELL);
        assert_eq!(g.part_at(&AND, Point::new(75.0, 75.0)), Some(NodePart::Body));
        assert_eq!(
            g.part_at(&AND, Point::new(-5.0, 25.0)),
            Some(NodePart::Connector {
                name: "A",
                anchor: Point::new(-6.25, 25.0),
            })
        );
        assert_eq!(
            g.part_at(&AND, Point::new(155.0, 80.0)),
            Some(NodePart::Connector {
                name: "C",
                anchor: Point::new(156.25, 75.0),
            })
        );
        // Right slot 0 has no connector on an AND gate.
        assert_eq!(g.part_at(&AND, Point::new(155.0, 25.0)), None);
        // Gap stripe between tabs.
        assert_eq!(g.part_at(&AND, Point::new(-5.0, 50.0)), None);
        // Outside entirely.
        assert_eq!(g.part_at(&AND, Point::new(200.0, 75.0)), None);
        // Corner of the band.
        assert_eq!(g.part_at(&AND, Point::new(-5.0, -5.0)), None);
    }

    #[test]
    fn top_and_bottom_connectors_are_found() {
        static PLUG: NodeTemplate = NodeTemplate {
            name: "PLUG",
            cols: 2,
            rows: 2,
            connectors: &[
                Connector::new("in", Side::Top, 1),
                Connector::new("out", Side::Bottom, 0),
            ],
        };
        let g = NodeGeometry::new(&PLUG, Point::new(100.0, 100.0), CELL);
        let top = g.anchor(Side::Top, 1);
        assert_eq!(top, Point::new(125.0, 43.75));
        assert_eq!(
            g.part_at(&PLUG, Point::new(125.0, 45.0)),
            Some(NodePart::Connector {
                name: "in",
                anchor: top,
            })
        );
        assert_eq!(
            g.part_at(&PLUG, Point::new(75.0, 155.0)),
            Some(NodePart::Connector {
                name: "out",
                anchor: Point::new(75.0, 156.25),
            })
        );
    }

    #[test]
    fn snapping_centers_odd_spans_on_cells() {
        assert_eq!(
            snap_node_position(Point::new(60.0, 99.0), Span::new(3, 3), CELL),
            Point::new(75.0, 75.0)
        );
        assert_eq!(
            snap_node_position(Point::new(60.0, 99.0), Span::new(2, 1), CELL),
            Point::new(50.0, 75.0)
        );
        assert_eq!(
            snap_node_position(Point::new(-10.0, -60.0), Span::new(2, 2), CELL),
            Point::new(-50.0, -100.0)
        );
    }
}
