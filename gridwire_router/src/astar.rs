// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A* search over a 4-connected cell grid.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;

use gridwire_index::CellKey;
use hashbrown::{HashMap, HashSet};
use kurbo::Point;

use crate::grid::RouteGrid;

/// Default cap on node expansions before a search gives up.
pub const DEFAULT_MAX_ITERATIONS: usize = 5000;

/// Neighbor order: east, west, south, north.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: (i32, i32),
    g: u64,
    parent: Option<usize>,
}

/// Orthogonal grid router.
///
/// Searches with unit edge cost and a Manhattan heuristic, which is admissible
/// for 4-directional movement, so found paths have the minimal cell count.
/// Among open nodes with equal `f = g + h`, the earliest inserted is expanded
/// first.
///
/// The search is bounded by a watchdog: once more than
/// [`Router::max_iterations`] nodes have been popped, it gives up and returns
/// an empty path. An empty path always means "no route found".
#[derive(Clone, Copy, Debug)]
pub struct Router {
    max_iterations: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with the [default watchdog](DEFAULT_MAX_ITERATIONS).
    pub const fn new() -> Self {
        Self::with_max_iterations(DEFAULT_MAX_ITERATIONS)
    }

    /// Create a router that gives up after `max_iterations` expansions.
    pub const fn with_max_iterations(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// The watchdog cap.
    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Route between two world points.
    ///
    /// Both points are snapped to their cells; the result is the sequence of
    /// world points of every cell on the path, start and end cells included.
    /// Returns an empty vector when no route exists or the watchdog fires.
    pub fn route<G: RouteGrid + ?Sized>(&self, grid: &G, a: Point, b: Point) -> Vec<Point> {
        let start = grid.world_to_grid(a);
        let end = grid.world_to_grid(b);
        self.route_cells(grid, start, end)
            .into_iter()
            .map(|(col, row)| grid.grid_to_world(col, row))
            .collect()
    }

    /// Route between two cells, returning the cells of the path.
    ///
    /// The start cell is never tested for walkability; the end cell must be
    /// walkable unless it equals the start.
    pub fn route_cells<G: RouteGrid + ?Sized>(
        &self,
        grid: &G,
        start: (i32, i32),
        end: (i32, i32),
    ) -> Vec<(i32, i32)> {
        let mut nodes: Vec<SearchNode> = Vec::new();
        // (f, insertion sequence, node index); `Reverse` turns the max-heap into a min-heap.
        let mut open: BinaryHeap<Reverse<(u64, u64, usize)>> = BinaryHeap::new();
        let mut closed: HashSet<CellKey> = HashSet::new();
        let mut g_score: HashMap<CellKey, u64> = HashMap::new();
        let mut seq = 0_u64;

        nodes.push(SearchNode {
            cell: start,
            g: 0,
            parent: None,
        });
        g_score.insert(CellKey::pack(start.0, start.1), 0);
        open.push(Reverse((manhattan(start, end), seq, 0)));

        let mut iterations = 0_usize;
        while let Some(Reverse((_, _, idx))) = open.pop() {
            iterations += 1;
            if iterations > self.max_iterations {
                tracing::warn!(
                    max_iterations = self.max_iterations,
                    ?start,
                    ?end,
                    "A* aborted: too many iterations"
                );
                return Vec::new();
            }

            let current = nodes[idx];
            if current.cell == end {
                return reconstruct(&nodes, idx);
            }

            // A cell may sit in the heap several times; only its best entry expands.
            if !closed.insert(CellKey::pack(current.cell.0, current.cell.1)) {
                continue;
            }

            for (dx, dy) in DIRECTIONS {
                let next = (current.cell.0 + dx, current.cell.1 + dy);
                let key = CellKey::pack(next.0, next.1);

                if !grid.is_walkable(next.0, next.1) || closed.contains(&key) {
                    continue;
                }

                let tentative = current.g + 1;
                if g_score.get(&key).is_some_and(|&old| tentative >= old) {
                    continue;
                }
                g_score.insert(key, tentative);

                seq += 1;
                nodes.push(SearchNode {
                    cell: next,
                    g: tentative,
                    parent: Some(idx),
                });
                open.push(Reverse((
                    tentative + manhattan(next, end),
                    seq,
                    nodes.len() - 1,
                )));
            }
        }

        Vec::new()
    }
}

/// Manhattan distance between two cells.
#[inline]
pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> u64 {
    u64::from(a.0.abs_diff(b.0)) + u64::from(a.1.abs_diff(b.1))
}

fn reconstruct(nodes: &[SearchNode], mut idx: usize) -> Vec<(i32, i32)> {
    let mut path = Vec::new();
    loop {
        let node = nodes[idx];
        path.push(node.cell);
        match node.parent {
            Some(parent) => idx = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellGrid;
    use alloc::vec;
    use rstest::rstest;

    fn is_orthogonal_walk(path: &[(i32, i32)]) -> bool {
        path.windows(2).all(|w| manhattan(w[0], w[1]) == 1)
    }

    #[rstest]
    #[case((0, 0), (5, 0))]
    #[case((0, 0), (0, -4))]
    #[case((2, 3), (-4, 9))]
    #[case((-10, -10), (10, 10))]
    fn free_grid_paths_are_optimal(#[case] start: (i32, i32), #[case] end: (i32, i32)) {
        let grid = CellGrid::open(50.0);
        let path = Router::new().route_cells(&grid, start, end);
        assert_eq!(path.len() as u64, manhattan(start, end) + 1);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert!(is_orthogonal_walk(&path));
    }

    #[test]
    fn same_cell_is_a_single_point() {
        let grid = CellGrid::open(50.0);
        let path = Router::new().route(&grid, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
        assert_eq!(path, vec![Point::new(25.0, 25.0)]);
    }

    #[test]
    fn ties_resolve_in_insertion_order() {
        // With FIFO ties the search commits to the first direction (east) and
        // only then turns south.
        let grid = CellGrid::open(1.0);
        let path = Router::new().route_cells(&grid, (0, 0), (2, 2));
        assert_eq!(path, vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn routes_around_a_wall() {
        // A wall at column 3 from row -2 to row 2.
        let grid = CellGrid::new(1.0, |c, r| !(c == 3 && (-2..=2).contains(&r)));
        let path = Router::new().route_cells(&grid, (0, 0), (6, 0));
        assert!(!path.is_empty());
        assert!(path.len() as u64 > manhattan((0, 0), (6, 0)) + 1);
        assert!(is_orthogonal_walk(&path));
        assert!(path.iter().all(|&(c, r)| grid.is_walkable(c, r)));
        // Shortest detour: 6 across + 3 up + 3 down.
        assert_eq!(path.len(), 13);
    }

    #[test]
    fn unreachable_target_in_bounded_grid_returns_empty() {
        // Target (5, 5) is walled in on a bounded 10×10 board.
        let grid = CellGrid::new(1.0, |c, r| {
            let inside = (0..10).contains(&c) && (0..10).contains(&r);
            let ring = (4..=6).contains(&c) && (4..=6).contains(&r) && (c, r) != (5, 5);
            inside && !ring
        });
        assert!(Router::new().route_cells(&grid, (0, 0), (5, 5)).is_empty());
    }

    #[test]
    fn watchdog_gives_up_on_unbounded_search() {
        // Walled-in target on an infinite board: only the watchdog stops this.
        let grid = CellGrid::new(1.0, |c, r| {
            !((4..=6).contains(&c) && (4..=6).contains(&r) && (c, r) != (5, 5))
        });
        let router = Router::with_max_iterations(500);
        assert_eq!(router.max_iterations(), 500);
        assert!(router.route_cells(&grid, (0, 0), (5, 5)).is_empty());
    }

    #[test]
    fn unwalkable_target_is_unreachable() {
        let grid = CellGrid::new(1.0, |c, r| (c, r) != (3, 0) && (0..5).contains(&c) && r.abs() < 3);
        assert!(Router::new().route_cells(&grid, (0, 0), (3, 0)).is_empty());
    }
}
