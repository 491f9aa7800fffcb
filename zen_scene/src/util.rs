// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use zen_region::Aabb2D;

pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1).normalized()
}

pub(crate) fn point_pair(p: Point) -> (f64, f64) {
    (p.x, p.y)
}
