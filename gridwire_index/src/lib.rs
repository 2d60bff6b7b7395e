// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gridwire Index: a hashed uniform grid for placing grid-aligned occupants.
//!
//! Gridwire Index answers "who is in this cell?" for an editor canvas whose
//! items snap to a fixed grid.
//!
//! - Register, update, and unregister occupants with a multi-cell [`Footprint`].
//! - Query by point or rectangle; results are de-duplicated.
//! - Check whether an occupant overlaps any other occupant (placement rejection).
//!
//! Cells are addressed by [`CellKey`], which packs two signed 16-bit
//! coordinates into a single `u32`. The addressable grid is therefore limited
//! to ±32768 cells per axis; coordinates past that wrap around.
//!
//! Registration is incremental: the index memoizes each occupant's base cell,
//! span, and exact cell keys. Re-registering an occupant whose base cell and
//! span did not change is a no-op, so it is cheap to call
//! [`GridIndex::update`] every frame.
//!
//! It is generic over the occupant handle and does not depend on any geometry crate.
//!
//! # Example
//!
//! ```rust
//! use gridwire_index::{Footprint, GridIndex, Span};
//!
//! let mut grid: GridIndex<u32> = GridIndex::new(50.0);
//!
//! // A 3×3 occupant centered on cell (2, 2), and a 1×1 one next to it.
//! grid.register(1, Footprint::new(125.0, 125.0, Span::new(3, 3)));
//! grid.register(2, Footprint::new(225.0, 125.0, Span::ONE));
//! assert!(!grid.is_occupied(1));
//!
//! // Move the small one onto the big one.
//! grid.update(2, Footprint::new(175.0, 125.0, Span::ONE));
//! assert!(grid.is_occupied(1));
//! assert!(grid.is_occupied(2));
//!
//! let hits = grid.query_point(180.0, 130.0);
//! assert_eq!(hits.len(), 2);
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod cell;
mod grid;

pub use cell::{CellKey, Footprint, Span, cell_coord};
pub use grid::GridIndex;
