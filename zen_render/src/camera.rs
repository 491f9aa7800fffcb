// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};
use zen_scene::EntityId;

/// A view onto part of a scene.
///
/// The camera observes the `fov`-sized rectangle at `view_point` in the
/// scene root's coordinate space and draws it into the `render_dimension`
/// rectangle at `render_origin` on the output surface.
///
/// The camera refers to its scene root by id only. Once that entity is
/// destroyed the camera renders nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Top-left corner of the field of view, in scene space.
    pub view_point: Point,
    /// Size of the field of view, in scene units.
    pub fov: Size,
    /// Top-left corner of the output rectangle, in surface pixels.
    pub render_origin: Point,
    /// Size of the output rectangle, in surface pixels.
    pub render_dimension: Size,
    /// Root of the observed subtree.
    pub scene: EntityId,
}

impl Camera {
    /// Create a camera over `scene`.
    pub fn new(
        scene: EntityId,
        view_point: Point,
        fov: Size,
        render_origin: Point,
        render_dimension: Size,
    ) -> Self {
        Self {
            view_point,
            fov,
            render_origin,
            render_dimension,
            scene,
        }
    }

    /// The observed rectangle in scene space.
    pub fn fov_rect(&self) -> Rect {
        Rect::from_origin_size(self.view_point, self.fov)
    }

    /// The output rectangle in surface space.
    pub fn render_rect(&self) -> Rect {
        Rect::from_origin_size(self.render_origin, self.render_dimension)
    }

    /// Scene units per output pixel on each axis.
    pub fn modifier(&self) -> Vec2 {
        Vec2::new(
            self.fov.width / self.render_dimension.width,
            self.fov.height / self.render_dimension.height,
        )
    }

    /// Whether both the field of view and the output rectangle have a positive area.
    pub fn is_renderable(&self) -> bool {
        self.fov.width > 0.0
            && self.fov.height > 0.0
            && self.render_dimension.width > 0.0
            && self.render_dimension.height > 0.0
    }

    /// Move the field of view by `delta` scene units.
    pub fn pan(&mut self, delta: Vec2) {
        self.view_point += delta;
    }
}
