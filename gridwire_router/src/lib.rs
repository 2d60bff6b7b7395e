// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridwire Router: orthogonal wire routing on a cell grid.
//!
//! - [`Router`] runs A* between two world points over a 4-connected grid with
//!   unit edge costs and a Manhattan heuristic.
//! - [`simplify_path`] collapses the resulting cell-by-cell walk into its
//!   corners.
//! - [`RouteGrid`] is the collaborator supplying grid/world conversion and
//!   walkability; [`CellGrid`] is a ready-made uniform grid over a predicate.
//!
//! Routing is fail-soft. A search that cannot reach its target, or that
//! exceeds the watchdog cap ([`DEFAULT_MAX_ITERATIONS`] by default), returns
//! an empty path and logs a warning through `tracing`. Callers should treat an
//! empty path as "no route found".
//!
//! # Example
//!
//! ```rust
//! use gridwire_router::{CellGrid, Router, simplify_path};
//! use kurbo::Point;
//!
//! // 50-unit cells, with a wall in column 2 spanning rows -1..=1.
//! let grid = CellGrid::new(50.0, |col, row| !(col == 2 && (-1..=1).contains(&row)));
//! let path = Router::new().route(&grid, Point::new(25.0, 25.0), Point::new(225.0, 25.0));
//! assert!(!path.is_empty());
//!
//! let corners = simplify_path(&path);
//! assert_eq!(corners.first(), Some(&Point::new(25.0, 25.0)));
//! assert_eq!(corners.last(), Some(&Point::new(225.0, 25.0)));
//! assert!(corners.len() < path.len());
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod astar;
mod grid;
mod simplify;

pub use astar::{DEFAULT_MAX_ITERATIONS, Router, manhattan};
pub use grid::{CellGrid, RouteGrid};
pub use simplify::simplify_path;
