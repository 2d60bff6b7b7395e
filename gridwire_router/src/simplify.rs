// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collapse collinear runs of an orthogonal path.

use alloc::vec::Vec;

use kurbo::Point;

/// Drop every interior point that shares an axis with both of its neighbors.
///
/// A point `b` between `a` and `c` is dropped when `a.x == b.x == c.x` or
/// `a.y == b.y == c.y`, so straight runs collapse to their two ends and only
/// corners survive. The first and last points are always kept. Neighbors are
/// taken from the input, not from the points kept so far.
pub fn simplify_path(points: &[Point]) -> Vec<Point> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(*first);
    for w in points.windows(3) {
        let (a, b, c) = (w[0], w[1], w[2]);
        if (a.x == b.x && b.x == c.x) || (a.y == b.y && b.y == c.y) {
            continue;
        }
        out.push(b);
    }
    out.push(*last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::Router;
    use crate::grid::{CellGrid, RouteGrid};
    use alloc::vec;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn short_paths_are_unchanged() {
        assert!(simplify_path(&[]).is_empty());
        let one = pts(&[(1.0, 2.0)]);
        assert_eq!(simplify_path(&one), one);
        let two = pts(&[(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(simplify_path(&two), two);
    }

    #[test]
    fn straight_run_collapses_to_ends() {
        let run = pts(&[(25.0, 25.0), (75.0, 25.0), (125.0, 25.0), (175.0, 25.0)]);
        assert_eq!(simplify_path(&run), pts(&[(25.0, 25.0), (175.0, 25.0)]));
    }

    #[test]
    fn corners_survive() {
        let l = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (2.0, 2.0)]);
        assert_eq!(simplify_path(&l), pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]));
    }

    #[test]
    fn staircase_keeps_every_turn() {
        let s = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0), (2.0, 2.0)]);
        assert_eq!(simplify_path(&s), s);
    }

    #[test]
    fn simplification_is_idempotent() {
        let grid = CellGrid::new(10.0, |c, r| !(c == 4 && (-3..=3).contains(&r)));
        let routed = Router::new().route(
            &grid,
            grid.grid_to_world(0, 0),
            grid.grid_to_world(9, 2),
        );
        assert!(!routed.is_empty());
        let once = simplify_path(&routed);
        let twice = simplify_path(&once);
        assert_eq!(once, twice);
        assert!(once.len() < routed.len());
        assert_eq!(once.first(), routed.first());
        assert_eq!(once.last(), routed.last());
    }

    #[test]
    fn free_scenario_is_a_single_segment() {
        let grid = CellGrid::open(50.0);
        let routed = Router::new().route(&grid, Point::new(0.0, 25.0), Point::new(125.0, 25.0));
        assert_eq!(routed.len(), 3);
        assert_eq!(
            simplify_path(&routed),
            vec![Point::new(25.0, 25.0), Point::new(125.0, 25.0)]
        );
    }
}
