// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hashed uniform grid of occupants.
//!
//! Each occupant is registered with a [`Footprint`] and lands in every cell of
//! that footprint. The exact cell keys of the last registration are memoized
//! per occupant, so that unregistering never has to recompute a footprint
//! that may since have changed, and re-registering at an unchanged base cell
//! is free.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::cell::{CellKey, Footprint, Span, cell_coord};

/// Occupant bucket of a single cell.
type Bucket<K> = SmallVec<[K; 4]>;

/// Memoized registration of one occupant.
#[derive(Clone, Debug)]
struct Registration {
    base: (i32, i32),
    span: Span,
    // Cells currently containing this occupant.
    cells: SmallVec<[CellKey; 9]>,
}

/// Hashed uniform grid mapping packed cell keys to occupant lists.
///
/// `K` is the occupant handle; the scene uses its entity ids.
pub struct GridIndex<K> {
    cell_size: f64,
    cells: HashMap<CellKey, Bucket<K>>,
    occupants: HashMap<K, Registration>,
}

impl<K: Debug> Debug for GridIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridIndex")
            .field("cell_size", &self.cell_size)
            .field("cells", &self.cells.len())
            .field("occupants", &self.occupants.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> GridIndex<K> {
    /// Create an empty index with the given cell size.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell_size must be strictly positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            occupants: HashMap::new(),
        }
    }

    /// The world-space size of one cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The cell containing a world-space point.
    pub fn cell_of(&self, x: f64, y: f64) -> (i32, i32) {
        (cell_coord(x, self.cell_size), cell_coord(y, self.cell_size))
    }

    /// World-space center of a cell.
    pub fn cell_center(&self, col: i32, row: i32) -> (f64, f64) {
        let half = self.cell_size * 0.5;
        (
            f64::from(col) * self.cell_size + half,
            f64::from(row) * self.cell_size + half,
        )
    }

    /// First cell `(col, row)` covered by a footprint.
    fn start_cell(&self, base: (i32, i32), span: Span) -> (i32, i32) {
        (
            base.0 - i32::from(span.cols / 2),
            base.1 - i32::from(span.rows / 2),
        )
    }

    fn covered_cells(&self, base: (i32, i32), span: Span) -> SmallVec<[CellKey; 9]> {
        let (c0, r0) = self.start_cell(base, span);
        let mut out = SmallVec::with_capacity(span.area());
        for dc in 0..i32::from(span.cols) {
            for dr in 0..i32::from(span.rows) {
                out.push(CellKey::pack(c0 + dc, r0 + dr));
            }
        }
        out
    }

    fn remove_from_cells(&mut self, key: K, cells: &[CellKey]) {
        for cell in cells {
            let bucket = self
                .cells
                .get_mut(cell)
                .expect("grid invariant violated: missing cell while removing occupant");

            let pos = bucket
                .iter()
                .position(|k| *k == key)
                .expect("grid invariant violated: occupant not found in expected cell");
            bucket.swap_remove(pos);

            if bucket.is_empty() {
                self.cells.remove(cell);
            }
        }
    }

    /// Register an occupant into every cell of its footprint.
    ///
    /// If the occupant is already registered with the same base cell and span,
    /// this returns `false` without touching any bucket. Otherwise the old
    /// cells are vacated, the new ones filled, and `true` is returned.
    pub fn register(&mut self, key: K, footprint: Footprint) -> bool {
        let base = self.cell_of(footprint.x, footprint.y);
        if let Some(reg) = self.occupants.get(&key)
            && reg.base == base
            && reg.span == footprint.span
        {
            return false;
        }

        if let Some(old) = self.occupants.remove(&key) {
            self.remove_from_cells(key, &old.cells);
        }

        let cells = self.covered_cells(base, footprint.span);
        for cell in &cells {
            self.cells.entry(*cell).or_default().push(key);
        }
        self.occupants.insert(
            key,
            Registration {
                base,
                span: footprint.span,
                cells,
            },
        );
        true
    }

    /// Re-register an occupant after it moved. Same as [`GridIndex::register`].
    pub fn update(&mut self, key: K, footprint: Footprint) -> bool {
        self.register(key, footprint)
    }

    /// Remove an occupant from every cell of its last registration.
    ///
    /// Returns `false` if the occupant was not registered.
    pub fn unregister(&mut self, key: K) -> bool {
        let Some(reg) = self.occupants.remove(&key) else {
            return false;
        };
        self.remove_from_cells(key, &reg.cells);
        true
    }

    /// Remove all occupants.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.occupants.clear();
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: K) -> bool {
        self.occupants.contains_key(&key)
    }

    /// Number of registered occupants.
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Whether no occupant is registered.
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The cells of `key`'s last registration, or an empty slice.
    pub fn cells_of(&self, key: K) -> &[CellKey] {
        self.occupants
            .get(&key)
            .map(|reg| reg.cells.as_slice())
            .unwrap_or(&[])
    }

    /// Occupants of one cell.
    pub fn occupants(&self, col: i32, row: i32) -> &[K] {
        self.cells
            .get(&CellKey::pack(col, row))
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any occupant is registered in the cell.
    pub fn is_cell_occupied(&self, col: i32, row: i32) -> bool {
        self.cells.contains_key(&CellKey::pack(col, row))
    }

    /// Whether any *other* occupant shares a cell with `key`.
    pub fn is_occupied(&self, key: K) -> bool {
        self.cells_of(key).iter().any(|cell| {
            self.cells
                .get(cell)
                .is_some_and(|bucket| bucket.iter().any(|k| *k != key))
        })
    }

    /// Occupants of the cell containing a world-space point.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<K> {
        let (col, row) = self.cell_of(x, y);
        self.occupants(col, row).to_vec()
    }

    /// Occupants of every cell touched by the world-space rectangle spanned
    /// by two opposite corners, de-duplicated in first-seen order.
    pub fn query_rect(&self, a: (f64, f64), b: (f64, f64)) -> Vec<K> {
        let (ca, ra) = self.cell_of(a.0, a.1);
        let (cb, rb) = self.cell_of(b.0, b.1);
        let (c0, c1) = if ca <= cb { (ca, cb) } else { (cb, ca) };
        let (r0, r1) = if ra <= rb { (ra, rb) } else { (rb, ra) };

        let mut seen: HashSet<K> = HashSet::new();
        let mut out = Vec::new();
        for col in c0..=c1 {
            for row in r0..=r1 {
                for &key in self.occupants(col, row) {
                    if seen.insert(key) {
                        out.push(key);
                    }
                }
            }
        }
        out
    }
}
