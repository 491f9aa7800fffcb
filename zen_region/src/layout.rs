// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid sizing policy and coordinate-to-bucket mapping.

use core::ops::RangeInclusive;

use crate::types::{Aabb2D, Bucket};

/// Bucket sizing rules applied whenever a region grid is (re)built.
///
/// An axis longer than `small_axis_threshold` is cut into buckets of
/// `target_bucket` units. A shorter axis is cut in half instead, so small
/// parents still get two buckets per axis. An axis of zero (or negative) length
/// collapses into a single bucket that spans every coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionPolicy {
    /// Preferred bucket edge length, in local units.
    pub target_bucket: f64,
    /// Axes at or below this length use half their length as the bucket size.
    pub small_axis_threshold: f64,
}

impl RegionPolicy {
    /// 50-unit buckets, halving axes of 100 units or less.
    pub const DEFAULT: Self = Self {
        target_bucket: 50.0,
        small_axis_threshold: 100.0,
    };

    /// Compute the grid layout for a parent of the given size.
    pub fn layout(&self, width: f64, height: f64) -> GridLayout {
        let (cols, bucket_width) = self.axis(width);
        let (rows, bucket_height) = self.axis(height);
        GridLayout {
            cols,
            rows,
            bucket_width,
            bucket_height,
        }
    }

    fn axis(&self, length: f64) -> (u32, f64) {
        // `!(x > 0)` also catches NaN.
        if !(length > 0.0) {
            return (1, 0.0);
        }
        let size = if length <= self.small_axis_threshold || !(self.target_bucket > 0.0) {
            length / 2.0
        } else {
            self.target_bucket
        };
        // Subnormal lengths halve to zero.
        if !(size > 0.0) {
            return (1, 0.0);
        }
        (ceil_count(length / size).max(1), size)
    }
}

impl Default for RegionPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Dimensions of a region grid: bucket counts per axis and bucket size.
///
/// A bucket size of `0.0` marks a degenerate axis with a single bucket that
/// covers every coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout {
    cols: u32,
    rows: u32,
    bucket_width: f64,
    bucket_height: f64,
}

impl GridLayout {
    /// Layout of a zero-sized parent: one bucket spanning everything.
    pub const SINGLE: Self = Self {
        cols: 1,
        rows: 1,
        bucket_width: 0.0,
        bucket_height: 0.0,
    };

    /// Number of bucket columns (never zero).
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of bucket rows (never zero).
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a single bucket.
    pub fn bucket_width(&self) -> f64 {
        self.bucket_width
    }

    /// Height of a single bucket.
    pub fn bucket_height(&self) -> f64 {
        self.bucket_height
    }

    /// The bucket holding a point, or `None` if the point falls outside the grid.
    pub fn bucket_at(&self, x: f64, y: f64) -> Option<Bucket> {
        let col = in_range(cell_coord(x, self.bucket_width)?, self.cols)?;
        let row = in_range(cell_coord(y, self.bucket_height)?, self.rows)?;
        Some((col, row))
    }

    /// Column and row ranges covered by `aabb`, clipped to the grid.
    ///
    /// Both corners are mapped with `floor(coordinate / bucket_size)` and the
    /// inclusive range between them is kept. Returns `None` when no bucket of
    /// the range lies inside the grid or when a corner is NaN.
    pub fn span(&self, aabb: &Aabb2D) -> Option<(RangeInclusive<u32>, RangeInclusive<u32>)> {
        if !aabb.is_nan_free() {
            return None;
        }
        let cols = clip_range(
            cell_coord(aabb.min_x, self.bucket_width)?,
            cell_coord(aabb.max_x, self.bucket_width)?,
            self.cols,
        )?;
        let rows = clip_range(
            cell_coord(aabb.min_y, self.bucket_height)?,
            cell_coord(aabb.max_y, self.bucket_height)?,
            self.rows,
        )?;
        Some((cols, rows))
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Map a coordinate to a bucket coordinate along one axis, rounding towards -inf.
///
/// Values beyond the `i64` range saturate. A bucket size of zero maps every
/// coordinate to bucket `0`. Returns `None` for NaN.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Bucket coordinates are intentionally i64; out-of-range values are saturated."
)]
pub(crate) fn cell_coord(value: f64, bucket_size: f64) -> Option<i64> {
    if value.is_nan() {
        return None;
    }
    if !(bucket_size > 0.0) {
        return Some(0);
    }
    let t = value / bucket_size;
    let coord = t as i64;

    // Round towards -inf (the cast above has already truncated).
    if t < 0.0 && (coord as f64) > t {
        Some(coord.saturating_sub(1))
    } else {
        Some(coord)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Bucket counts are clamped to u32; larger grids are not representable."
)]
fn ceil_count(t: f64) -> u32 {
    let c = t as u64;
    let c = if (c as f64) < t { c.saturating_add(1) } else { c };
    c.min(u64::from(u32::MAX)) as u32
}

fn in_range(coord: i64, len: u32) -> Option<u32> {
    u32::try_from(coord).ok().filter(|&c| c < len)
}

fn clip_range(a: i64, b: i64, len: u32) -> Option<RangeInclusive<u32>> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let last = i64::from(len) - 1;
    if hi < 0 || lo > last {
        return None;
    }
    let lo = u32::try_from(lo.max(0)).ok()?;
    let hi = u32::try_from(hi.min(last)).ok()?;
    Some(lo..=hi)
}
