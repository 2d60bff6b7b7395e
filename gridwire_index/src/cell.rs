// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell coordinates, packed cell keys, and occupant footprints.

/// Packed grid cell key.
///
/// Two signed 16-bit cell coordinates packed into one `u32`:
/// `(col & 0xFFFF) << 16 | (row & 0xFFFF)`.
///
/// This bounds the addressable grid to ±32768 cells per axis. Coordinates
/// outside that range wrap around and alias other cells; this is an operating
/// bound of the index, not a checked error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u32);

impl CellKey {
    /// Pack a `(col, row)` pair.
    #[allow(
        clippy::cast_sign_loss,
        reason = "Only the low 16 bits of each coordinate are kept by design."
    )]
    #[inline]
    pub const fn pack(col: i32, row: i32) -> Self {
        Self(((col as u32 & 0xFFFF) << 16) | (row as u32 & 0xFFFF))
    }

    /// Unpack into `(col, row)`, sign-extending each 16-bit half.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Each half is exactly 16 bits wide."
    )]
    #[inline]
    pub const fn unpack(self) -> (i32, i32) {
        let col = (self.0 >> 16) as u16 as i16;
        let row = (self.0 & 0xFFFF) as u16 as i16;
        (col as i32, row as i32)
    }

    /// The raw packed value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Map a world coordinate to a cell coordinate along one axis.
///
/// Equivalent to `floor(value / cell_size)`, saturated to the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub fn cell_coord(value: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
    let t = value / cell_size;
    let coord = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// Number of cells an occupant covers along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    /// Columns covered.
    pub cols: u16,
    /// Rows covered.
    pub rows: u16,
}

impl Span {
    /// A single cell.
    pub const ONE: Self = Self { cols: 1, rows: 1 };

    /// Create a span of `cols × rows` cells.
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Number of cells covered.
    pub const fn area(self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

/// Position and span of an occupant.
///
/// The position is the occupant's world-space origin. Odd spans are centered
/// on the cell containing the origin; even spans extend one cell further
/// towards negative coordinates, so an origin on a grid line is centered.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Footprint {
    /// World-space x of the origin.
    pub x: f64,
    /// World-space y of the origin.
    pub y: f64,
    /// Covered cells.
    pub span: Span,
}

impl Footprint {
    /// Create a footprint.
    pub const fn new(x: f64, y: f64, span: Span) -> Self {
        Self { x, y, span }
    }

    /// A single-cell footprint at `(x, y)`.
    pub const fn point(x: f64, y: f64) -> Self {
        Self::new(x, y, Span::ONE)
    }
}
