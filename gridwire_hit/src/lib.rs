// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives and precise hit testing for grid editors.
//!
//! This crate provides the narrow-phase half of hit testing, built on top of
//! [`kurbo`]: a cheap, conservative [`Aabb`] for broad-phase culling and
//! precise [`Collider`]s that decide whether a world-space point really
//! touches an entity.
//!
//! # Typical usage
//!
//! - Cull candidates with their bounding boxes ([`Aabb::contains_point`]).
//! - Call [`Collider::contains`] (or [`PreciseHitTest::hit_test_local`] when
//!   tolerances or scores matter) on the survivors.
//! - Use the returned [`HitScore`] only for ranking; entity-level tie-breaks
//!   (layers, z-order) belong to the caller.
//!
//! # Key types
//!
//! - [`Aabb`] – center-based axis-aligned box with inclusive tests.
//! - [`Collider`] – closed set of precise shapes: a rotatable
//!   [`BoxCollider`] and a stroked [`PolylineCollider`].
//! - [`HitParams`] – per-query fill/stroke tolerances.
//! - [`HitScore`] – `{ distance, kind }` record for ranking candidates.
//!
//! ```rust
//! use gridwire_hit::{Collider, PolylineCollider};
//! use kurbo::Point;
//!
//! let wire = Collider::Polyline(PolylineCollider::new(
//!     vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
//!     14.0,
//! ));
//! assert!(wire.contains(Point::new(40.0, 6.0)));
//! assert!(!wire.contains(Point::new(40.0, 8.0)));
//! ```

#![no_std]

extern crate alloc;

use core::cmp::Ordering;

use kurbo::Point;

mod aabb;
mod collider;
/// Stroke-oriented helpers and primitives.
pub mod stroke;

pub use aabb::Aabb;
pub use collider::{BoxCollider, Collider, PolylineCollider};

/// Kind of hit produced by a precise test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitKind {
    /// Hit the interior of a shape.
    Fill,
    /// Hit the stroked outline of a shape.
    Stroke,
}

/// Parameters controlling precise hit tests.
#[derive(Clone, Copy, Debug)]
pub struct HitParams {
    /// Tolerance in world units for hits against filled regions.
    ///
    /// Inflates boxes on every side, for fuzzy pointer input.
    pub fill_tolerance: f64,
    /// Tolerance in world units for hits against stroked outlines.
    ///
    /// Added to a stroke's half-width.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fill_tolerance: 0.0,
            stroke_tolerance: 0.0,
        }
    }
}

/// Score returned from a precise hit.
///
/// Lower distance is considered a better (closer) hit for tie-breaking.
#[derive(Clone, Copy, Debug)]
pub struct HitScore {
    /// Geometric distance from the shape.
    pub distance: f64,
    /// Classification of what was hit.
    pub kind: HitKind,
}

impl HitScore {
    /// Convenience constructor for a filled hit at distance 0.
    pub const fn filled() -> Self {
        Self {
            distance: 0.0,
            kind: HitKind::Fill,
        }
    }

    /// Compare two scores, preferring smaller distance; ties keep original order.
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Trait for precise 2D hit testing.
///
/// Colliders in this crate store world-space geometry, so the "local" space
/// of the query is world space. Implementors should treat the tolerances in
/// [`HitParams`] as inclusive radii.
pub trait PreciseHitTest {
    /// Perform a precise hit test against `pt`.
    ///
    /// Returns `Some(HitScore)` when the point is considered a hit.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}
