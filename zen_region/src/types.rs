// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

/// Grid coordinate of a bucket: `(column, row)`.
pub type Bucket = (u32, u32);

/// Axis-aligned bounding box in a parent's local coordinate space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x (left)
    pub min_x: f64,
    /// Minimum y (top)
    pub min_y: f64,
    /// Maximum x (right)
    pub max_x: f64,
    /// Maximum y (bottom)
    pub max_y: f64,
}

impl Aabb2D {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create an AABB from an origin and a size.
    ///
    /// Negative sizes are normalized so that `min <= max` on both axes.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h).normalized()
    }

    /// Create the AABB spanned by two corner points, in any order.
    #[inline]
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self::new(a.0, a.1, b.0, b.1).normalized()
    }

    /// Return a copy with `min <= max` on both axes.
    #[inline]
    pub fn normalized(self) -> Self {
        let (min_x, max_x) = if self.min_x <= self.max_x {
            (self.min_x, self.max_x)
        } else {
            (self.max_x, self.min_x)
        };
        let (min_y, max_y) = if self.min_y <= self.max_y {
            (self.min_y, self.max_y)
        } else {
            (self.max_y, self.min_y)
        };
        Self::new(min_x, min_y, max_x, max_y)
    }

    /// Whether this AABB contains the point.
    ///
    /// Edges are part of the box: a point lying exactly on an edge is contained.
    #[inline]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && self.min_y <= y && x <= self.max_x && y <= self.max_y
    }

    /// Width of the box (never negative for a normalized box).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box (never negative for a normalized box).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when no corner is NaN.
    #[inline]
    pub fn is_nan_free(&self) -> bool {
        !(self.min_x.is_nan() || self.min_y.is_nan() || self.max_x.is_nan() || self.max_y.is_nan())
    }
}
