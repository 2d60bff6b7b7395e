// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: entity identifiers, flags, and configuration.

use gridwire_hit::HitParams;
use gridwire_router::DEFAULT_MAX_ITERATIONS;

/// Identifier for an entity in the scene (generational).
///
/// Slots are recycled, but the generation is bumped each time, so an id is
/// never handed out twice.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Entity flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u8 {
        /// Entity is visible (drawn, and its wire routes are kept up to date).
        const VISIBLE  = 0b0000_0001;
        /// Entity is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Filters applied during picking and viewport queries.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required entity flags. Only entities containing all these flags are included.
    pub required_flags: EntityFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: EntityFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all entities).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only visible entities.
    pub fn visible(mut self) -> Self {
        self.required_flags |= EntityFlags::VISIBLE;
        self
    }

    /// Filter to only pickable entities.
    pub fn pickable(mut self) -> Self {
        self.required_flags |= EntityFlags::PICKABLE;
        self
    }

    /// Check if an entity's flags satisfy this filter.
    pub fn matches(&self, flags: EntityFlags) -> bool {
        flags.contains(self.required_flags)
    }
}

/// Inclusive rectangle of grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellBounds {
    /// Leftmost column.
    pub min_col: i32,
    /// Topmost row.
    pub min_row: i32,
    /// Rightmost column.
    pub max_col: i32,
    /// Bottommost row.
    pub max_row: i32,
}

impl CellBounds {
    /// Create bounds from two opposite corner cells, in any order.
    pub fn new(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min_col: a.0.min(b.0),
            min_row: a.1.min(b.1),
            max_col: a.0.max(b.0),
            max_row: a.1.max(b.1),
        }
    }

    /// Whether the cell lies within the bounds.
    pub fn contains(&self, col: i32, row: i32) -> bool {
        (self.min_col..=self.max_col).contains(&col) && (self.min_row..=self.max_row).contains(&row)
    }
}

/// Scene-wide settings.
#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    /// Grid cell size in world units. Node spans, connector sizes, grid
    /// registration, and wire routing are all derived from it.
    pub cell_size: f64,
    /// Stroke thickness of new wires.
    pub wire_thickness: f64,
    /// Watchdog cap of the wire router.
    pub max_route_iterations: usize,
    /// Cells wires may be routed through. `None` leaves the canvas unbounded,
    /// in which case only the watchdog stops a search for an unreachable end.
    pub route_bounds: Option<CellBounds>,
    /// Tolerances for [`Scene::pick`](crate::Scene::pick) and
    /// [`Scene::hits`](crate::Scene::hits). Exact by default.
    pub hit_params: HitParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            wire_thickness: 14.0,
            max_route_iterations: DEFAULT_MAX_ITERATIONS,
            route_bounds: None,
            hit_params: HitParams::default(),
        }
    }
}
