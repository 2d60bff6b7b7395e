// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-oriented helpers for precise hit testing.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

use crate::{HitKind, HitParams, HitScore, PreciseHitTest};

/// Distance from `pt` to the closest point of the segment `p0..p1`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment measures to `p0`.
pub fn segment_distance(p0: Point, p1: Point, pt: Point) -> f64 {
    let vx = p1.x - p0.x;
    let vy = p1.y - p0.y;
    let wx = pt.x - p0.x;
    let wy = pt.y - p0.y;
    let len2 = vx * vx + vy * vy;
    let t = if len2 > 0.0 {
        (wx * vx + wy * vy) / len2
    } else {
        0.0
    };
    let t = t.clamp(0.0, 1.0);
    let proj_x = p0.x + t * vx;
    let proj_y = p0.y + t * vy;
    let dx = pt.x - proj_x;
    let dy = pt.y - proj_y;
    (dx * dx + dy * dy).sqrt()
}

/// A stroked line segment (centerline + half-width).
///
/// Hits when the distance from the query point to the segment is at most the
/// half-width plus [`HitParams::stroke_tolerance`]. No joins or caps are
/// modelled; the ends are effectively round.
#[derive(Clone, Copy, Debug)]
pub struct StrokedLine {
    /// The centerline segment.
    pub line: Line,
    /// Half of the stroke width.
    pub half_width: f64,
}

impl PreciseHitTest for StrokedLine {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = segment_distance(self.line.p0, self.line.p1, pt);
        let limit = self.half_width + params.stroke_tolerance;
        if dist <= limit {
            Some(HitScore {
                distance: dist,
                kind: HitKind::Stroke,
            })
        } else {
            None
        }
    }
}
