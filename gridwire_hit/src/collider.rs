// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precise colliders attached to scene entities.

use alloc::vec::Vec;

use kurbo::{Affine, Line, Point, Vec2};

use crate::stroke::StrokedLine;
use crate::{HitKind, HitParams, HitScore, PreciseHitTest};

/// A possibly rotated rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollider {
    /// Center in world space.
    pub center: Point,
    /// Half of the width.
    pub half_width: f64,
    /// Half of the height.
    pub half_height: f64,
    /// Rotation around the center, in radians.
    pub angle: f64,
}

impl BoxCollider {
    /// Create an axis-aligned box collider.
    pub fn new(width: f64, height: f64, center: Point) -> Self {
        Self::rotated(width, height, center, 0.0)
    }

    /// Create a box collider rotated by `angle` radians around its center.
    pub fn rotated(width: f64, height: f64, center: Point, angle: f64) -> Self {
        Self {
            center,
            half_width: width / 2.0,
            half_height: height / 2.0,
            angle,
        }
    }

    /// Replace the box data in place.
    pub fn update(&mut self, width: f64, height: f64, center: Point, angle: f64) {
        *self = Self::rotated(width, height, center, angle);
    }

    /// Map a world-space point into the box's unrotated local frame.
    fn to_local(&self, pt: Point) -> Vec2 {
        let v = pt - self.center;
        if self.angle == 0.0 {
            v
        } else {
            (Affine::rotate(-self.angle) * v.to_point()).to_vec2()
        }
    }
}

impl PreciseHitTest for BoxCollider {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let v = self.to_local(pt);
        let hw = self.half_width + params.fill_tolerance;
        let hh = self.half_height + params.fill_tolerance;
        if -hw <= v.x && v.x <= hw && -hh <= v.y && v.y <= hh {
            // Distance to the untolerated box; interior points are 0.
            let dx = (v.x.abs() - self.half_width).max(0.0);
            let dy = (v.y.abs() - self.half_height).max(0.0);
            Some(HitScore {
                distance: Vec2::new(dx, dy).hypot(),
                kind: HitKind::Fill,
            })
        } else {
            None
        }
    }
}

/// An open polyline stroked with a fixed thickness.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PolylineCollider {
    /// Full stroke thickness.
    pub thickness: f64,
    /// Waypoints in world space.
    pub points: Vec<Point>,
}

impl PolylineCollider {
    /// Create a polyline collider.
    pub fn new(points: Vec<Point>, thickness: f64) -> Self {
        Self { thickness, points }
    }

    /// Replace the waypoints, and the thickness if one is given.
    pub fn update(&mut self, points: &[Point], thickness: Option<f64>) {
        self.points.clear();
        self.points.extend_from_slice(points);
        if let Some(t) = thickness {
            self.thickness = t;
        }
    }

    /// Segments of the polyline as stroked lines.
    pub fn segments(&self) -> impl Iterator<Item = StrokedLine> + '_ {
        let half_width = self.thickness * 0.5;
        self.points.windows(2).map(move |w| StrokedLine {
            line: Line::new(w[0], w[1]),
            half_width,
        })
    }
}

impl PreciseHitTest for PolylineCollider {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        // First segment within reach wins.
        self.segments()
            .find_map(|segment| segment.hit_test_local(pt, params))
    }
}

/// Precise shape of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Collider {
    /// Rotatable rectangle, used by nodes and sized entities.
    Box(BoxCollider),
    /// Stroked polyline, used by wires.
    Polyline(PolylineCollider),
}

impl Collider {
    /// Whether the point hits the collider with default parameters.
    pub fn contains(&self, pt: Point) -> bool {
        self.hit_test_local(pt, &HitParams::default()).is_some()
    }
}

impl PreciseHitTest for Collider {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        match self {
            Self::Box(b) => b.hit_test_local(pt, params),
            Self::Polyline(p) => p.hit_test_local(pt, params),
        }
    }
}
