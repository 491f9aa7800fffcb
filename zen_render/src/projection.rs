// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-to-surface projection: culling, clipping and scaling.

use kurbo::{Rect, Size, Vec2};

use crate::camera::Camera;

/// How much of a box lies beyond each edge of a camera's field of view, in
/// scene units. Every value is at least zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Clip {
    /// Extent left of the field of view.
    pub left: f64,
    /// Extent right of the field of view.
    pub right: f64,
    /// Extent above the field of view.
    pub top: f64,
    /// Extent below the field of view.
    pub bottom: f64,
}

impl Clip {
    /// Clip amounts of `bounds` against `fov`.
    pub fn between(bounds: Rect, fov: Rect) -> Self {
        Self {
            left: (fov.x0 - bounds.x0).max(0.0),
            right: (bounds.x1 - fov.x1).max(0.0),
            top: (fov.y0 - bounds.y0).max(0.0),
            bottom: (bounds.y1 - fov.y1).max(0.0),
        }
    }

    /// True if nothing is clipped.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Where and how an entity lands on the output surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Clip amounts in scene units.
    pub clip: Clip,
    /// Entity size left after clipping, in scene units.
    pub clipped_size: Size,
    /// Destination rectangle on the surface.
    pub dest: Rect,
}

impl Projection {
    /// Source rectangle within an image of `image_size` pixels stretched over
    /// an entity of `entity_size`, matching the clipped part of the entity.
    ///
    /// Returns `None` if the entity has no area to map the image onto.
    pub fn source_rect(&self, image_size: Size, entity_size: Size) -> Option<Rect> {
        if !(entity_size.width > 0.0 && entity_size.height > 0.0) {
            return None;
        }
        let ratio = Vec2::new(
            image_size.width / entity_size.width,
            image_size.height / entity_size.height,
        );
        Some(Rect::from_origin_size(
            (self.clip.left * ratio.x, self.clip.top * ratio.y),
            (
                self.clipped_size.width * ratio.x,
                self.clipped_size.height * ratio.y,
            ),
        ))
    }
}

/// Strict overlap on both axes; boxes that only share an edge do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Project a box given in scene space through `camera`.
///
/// Returns `None` when the box lies outside the field of view. Otherwise the
/// box is clipped to the field of view and scaled by the camera's modifier;
/// a box clipped on its left or top edge starts exactly at the render origin.
pub fn project(camera: &Camera, bounds: Rect) -> Option<Projection> {
    let fov = camera.fov_rect();
    if !overlaps(bounds, fov) {
        return None;
    }
    let clip = Clip::between(bounds, fov);
    let modifier = camera.modifier();

    let relative = Vec2::new(
        ((bounds.x0 - fov.x0) / modifier.x).max(0.0),
        ((bounds.y0 - fov.y0) / modifier.y).max(0.0),
    );
    let clipped_size = Size::new(
        bounds.width() - clip.left - clip.right,
        bounds.height() - clip.top - clip.bottom,
    );
    let dest = Rect::from_origin_size(
        camera.render_origin + relative,
        (
            clipped_size.width / modifier.x,
            clipped_size.height / modifier.y,
        ),
    );
    Some(Projection {
        clip,
        clipped_size,
        dest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use zen_scene::Scene;

    fn camera(view_point: Point, fov: Size, render_origin: Point, render: Size) -> Camera {
        let mut scene = Scene::new();
        let root = scene.create_default();
        Camera::new(root, view_point, fov, render_origin, render)
    }

    #[test]
    fn inside_fov_is_only_scaled() {
        let cam = camera(
            Point::ZERO,
            Size::new(100.0, 100.0),
            Point::ZERO,
            Size::new(50.0, 50.0),
        );
        let p = project(&cam, Rect::new(50.0, 50.0, 90.0, 90.0)).unwrap();
        assert!(p.clip.is_empty());
        assert_eq!(p.dest, Rect::new(25.0, 25.0, 45.0, 45.0));
        assert_eq!(p.clipped_size, Size::new(40.0, 40.0));
    }

    #[test]
    fn crossing_edges_are_clipped() {
        let cam = camera(
            Point::new(100.0, 100.0),
            Size::new(200.0, 100.0),
            Point::new(10.0, 20.0),
            Size::new(400.0, 100.0),
        );
        // Sticks out 20 to the left and 30 below.
        let p = project(&cam, Rect::new(80.0, 150.0, 130.0, 230.0)).unwrap();
        assert_eq!(
            p.clip,
            Clip {
                left: 20.0,
                right: 0.0,
                top: 0.0,
                bottom: 30.0
            }
        );
        assert_eq!(p.clipped_size, Size::new(30.0, 50.0));
        // x: clamped to the render origin; y: (150 - 100) / 1.
        assert_eq!(p.dest, Rect::new(10.0, 70.0, 70.0, 120.0));
    }

    #[test]
    fn culling_is_strict() {
        let cam = camera(
            Point::new(100.0, 0.0),
            Size::new(100.0, 100.0),
            Point::ZERO,
            Size::new(100.0, 100.0),
        );
        assert!(project(&cam, Rect::new(50.0, 10.0, 100.0, 20.0)).is_none());
        assert!(project(&cam, Rect::new(200.0, 10.0, 250.0, 20.0)).is_none());
        assert!(project(&cam, Rect::new(120.0, 100.0, 130.0, 120.0)).is_none());
        assert!(project(&cam, Rect::new(99.0, 10.0, 101.0, 20.0)).is_some());
    }

    #[test]
    fn source_rect_follows_clip() {
        let cam = camera(
            Point::new(10.0, 0.0),
            Size::new(100.0, 100.0),
            Point::ZERO,
            Size::new(100.0, 100.0),
        );
        // Entity 40 wide with a 200 px image: 5 px per unit.
        let p = project(&cam, Rect::new(0.0, 0.0, 40.0, 20.0)).unwrap();
        let src = p
            .source_rect(Size::new(200.0, 100.0), Size::new(40.0, 20.0))
            .unwrap();
        assert_eq!(src, Rect::new(50.0, 0.0, 200.0, 100.0));
        assert!(p.source_rect(Size::new(200.0, 100.0), Size::ZERO).is_none());
    }
}
