// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Center-based axis-aligned bounding box.

use kurbo::{Point, Rect, Size};

/// Axis-aligned bounding box stored as a center and a size.
///
/// All edge tests are inclusive: a point on the edge is inside, and two boxes
/// sharing an edge overlap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Center of the box.
    pub center: Point,
    /// Full width. Never negative.
    pub width: f64,
    /// Full height. Never negative.
    pub height: f64,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::at(Point::ZERO)
    }
}

impl Aabb {
    /// Create a box from its center and size.
    #[inline]
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "AABB extents must be non-negative"
        );
        Self {
            center,
            width,
            height,
        }
    }

    /// A zero-size box at `p`.
    #[inline]
    pub const fn at(p: Point) -> Self {
        Self {
            center: p,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Create a box centered on `center` with the given size.
    #[inline]
    pub fn from_center_size(center: Point, size: Size) -> Self {
        Self::new(center, size.width, size.height)
    }

    /// The smallest box containing two opposite corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            center: a.midpoint(b),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Convert from a `kurbo` rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::from_corners(Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1))
    }

    /// Convert to a `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    /// Top edge (smallest y).
    #[inline]
    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    /// Bottom edge (largest y).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// Whether the point lies inside or on the edge.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Whether the two boxes overlap. Touching edges count.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Whether `other` lies entirely inside this box.
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// The smallest box enclosing both.
    pub fn union(&self, other: &Self) -> Self {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::from_corners(Point::new(x0, y0), Point::new(x1, y1))
    }

    /// The union of a sequence of boxes, or `None` if it is empty.
    pub fn union_all<I: IntoIterator<Item = Self>>(boxes: I) -> Option<Self> {
        let mut it = boxes.into_iter();
        let first = it.next()?;
        Some(it.fold(first, |acc, b| acc.union(&b)))
    }

    /// Grow the box by `dx` on the left and right, `dy` on the top and bottom.
    pub fn inflate(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.center,
            (self.width + 2.0 * dx).max(0.0),
            (self.height + 2.0 * dy).max(0.0),
        )
    }

    /// The box moved by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            center: Point::new(self.center.x + dx, self.center.y + dy),
            ..*self
        }
    }
}
