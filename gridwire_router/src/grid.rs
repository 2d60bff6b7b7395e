// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid the router searches over.

use gridwire_index::cell_coord;
use kurbo::Point;

/// Grid/world conversion and walkability, as seen by the router.
///
/// `world_to_grid` and `grid_to_world` must agree with each other: the world
/// point of a cell must map back to that cell.
pub trait RouteGrid {
    /// The cell containing a world-space point.
    fn world_to_grid(&self, p: Point) -> (i32, i32);

    /// The world-space point a path through `(col, row)` passes through,
    /// usually the cell center.
    fn grid_to_world(&self, col: i32, row: i32) -> Point;

    /// Whether a route may pass through the cell.
    fn is_walkable(&self, col: i32, row: i32) -> bool;
}

impl<G: RouteGrid + ?Sized> RouteGrid for &G {
    fn world_to_grid(&self, p: Point) -> (i32, i32) {
        (**self).world_to_grid(p)
    }

    fn grid_to_world(&self, col: i32, row: i32) -> Point {
        (**self).grid_to_world(col, row)
    }

    fn is_walkable(&self, col: i32, row: i32) -> bool {
        (**self).is_walkable(col, row)
    }
}

/// A uniform grid with square cells and a walkability predicate.
///
/// Paths pass through cell centers.
#[derive(Clone, Copy, Debug)]
pub struct CellGrid<F> {
    cell_size: f64,
    walkable: F,
}

impl<F: Fn(i32, i32) -> bool> CellGrid<F> {
    /// Create a grid with the given cell size and walkability predicate.
    pub fn new(cell_size: f64, walkable: F) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
        Self {
            cell_size,
            walkable,
        }
    }

    /// The world-space size of one cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl CellGrid<fn(i32, i32) -> bool> {
    /// A grid where every cell is walkable.
    pub fn open(cell_size: f64) -> Self {
        Self::new(cell_size, |_, _| true)
    }
}

impl<F: Fn(i32, i32) -> bool> RouteGrid for CellGrid<F> {
    fn world_to_grid(&self, p: Point) -> (i32, i32) {
        (cell_coord(p.x, self.cell_size), cell_coord(p.y, self.cell_size))
    }

    fn grid_to_world(&self, col: i32, row: i32) -> Point {
        let half = self.cell_size * 0.5;
        Point::new(
            f64::from(col) * self.cell_size + half,
            f64::from(row) * self.cell_size + half,
        )
    }

    fn is_walkable(&self, col: i32, row: i32) -> bool {
        (self.walkable)(col, row)
    }
}
