// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame rendering pass.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use log::{debug, trace, warn};
use peniko::Color;
use zen_scene::{AssetId, AssetSource, Entity, EntityId, ImageData, Scene};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::projection::{Projection, project};
use crate::surface::{Surface, SurfaceError};

const DEBUG_LINE_WIDTH: f64 = 7.0;

/// Debug overlays drawn by a pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Outline the occupied region buckets of every drawn entity.
    pub debug_regions: bool,
    /// Outline each camera's field of view (red) and output rectangle
    /// (black fill, green outline) before drawing its scene.
    pub debug_cameras: bool,
}

/// What a pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Cameras rendered (skipped cameras are not counted).
    pub cameras: usize,
    /// Visible entities reached by the walk, HUD included.
    pub visited: usize,
    /// Entities that issued at least one fill or image draw.
    pub drawn: usize,
    /// Entities culled along with their subtrees.
    pub culled: usize,
    /// Entities whose drawing failed.
    pub failed: usize,
}

/// Camera list plus optional HUD layer, rendered together each frame.
#[derive(Clone, Debug, Default)]
pub struct RenderingEngine {
    cameras: Vec<Camera>,
    hud: Option<EntityId>,
    options: RenderOptions,
}

impl RenderingEngine {
    /// An engine with no camera and no HUD.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a camera. Cameras render in the order they were added.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    /// Remove the camera at `index`.
    pub fn remove_camera(&mut self, index: usize) -> Option<Camera> {
        (index < self.cameras.len()).then(|| self.cameras.remove(index))
    }

    /// Cameras in render order.
    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    /// Mutable access to a camera, e.g. to pan it.
    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    /// Entity drawn on top of every camera, in surface coordinates.
    pub fn hud(&self) -> Option<EntityId> {
        self.hud
    }

    /// Set or clear the HUD entity.
    pub fn set_hud(&mut self, hud: Option<EntityId>) {
        self.hud = hud;
    }

    /// Current debug options.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Replace the debug options.
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Render one frame. See [`render_frame`].
    pub fn render(
        &self,
        scene: &mut Scene,
        assets: &dyn AssetSource,
        surface: &mut dyn Surface,
    ) -> FrameStats {
        render_frame(
            scene,
            assets,
            surface,
            &self.cameras,
            self.hud,
            self.options,
        )
    }
}

/// Render every camera in order, then the HUD.
///
/// For each camera the observed subtree is walked in paint order. An entity
/// outside the camera's field of view is skipped with its whole subtree, as
/// is an invisible one. Everything else is clipped to the field of view,
/// scaled into the camera's output rectangle and drawn: fill color first,
/// then texture.
///
/// The HUD is drawn last, unclipped and unscaled, at each entity's own `x`
/// and `y`.
///
/// A failed draw only affects the entity concerned. Once the pass completes,
/// the modified flags of every rendered subtree are cleared.
pub fn render_frame(
    scene: &mut Scene,
    assets: &dyn AssetSource,
    surface: &mut dyn Surface,
    cameras: &[Camera],
    hud: Option<EntityId>,
    options: RenderOptions,
) -> FrameStats {
    let mut pass = Pass {
        scene: &*scene,
        assets,
        surface,
        options,
        stats: FrameStats::default(),
    };
    let mut rendered: Vec<EntityId> = Vec::with_capacity(cameras.len() + 1);
    for camera in cameras {
        if pass.camera(camera) {
            rendered.push(camera.scene);
        }
    }
    if let Some(hud) = hud {
        if pass.scene.is_alive(hud) {
            pass.hud(hud);
            rendered.push(hud);
        } else {
            warn!("HUD entity {hud:?} no longer exists");
        }
    }
    let stats = pass.stats;

    for root in rendered {
        scene.clear_modified(root);
    }
    debug!(
        "frame: {} cameras, {} visited, {} drawn, {} culled, {} failed",
        stats.cameras, stats.visited, stats.drawn, stats.culled, stats.failed
    );
    stats
}

struct Pass<'a> {
    scene: &'a Scene,
    assets: &'a dyn AssetSource,
    surface: &'a mut dyn Surface,
    options: RenderOptions,
    stats: FrameStats,
}

impl<'a> Pass<'a> {
    fn camera(&mut self, camera: &Camera) -> bool {
        if !camera.is_renderable() {
            warn!("skipping camera with an empty view: {camera:?}");
            return false;
        }
        if !self.scene.is_alive(camera.scene) {
            warn!("skipping camera over destroyed scene {:?}", camera.scene);
            return false;
        }
        self.stats.cameras += 1;
        if self.options.debug_cameras
            && let Err(err) = self.camera_overlay(camera)
        {
            debug!("camera overlay failed: {err}");
        }
        self.entity(camera.scene, camera);
        true
    }

    fn entity(&mut self, id: EntityId, camera: &Camera) {
        let scene = self.scene;
        let Some(entity) = scene.get(id) else {
            return;
        };
        if !entity.is_visible() {
            return;
        }
        self.stats.visited += 1;
        let Some(bounds) = scene.absolute_bounds(id) else {
            return;
        };
        let Some(projection) = project(camera, bounds) else {
            trace!("culled {id:?} at {bounds:?}");
            self.stats.culled += 1;
            return;
        };

        let result = self.paint_projected(entity, bounds.origin(), &projection);
        self.record(result);

        for &child in entity.children() {
            self.entity(child, camera);
        }
    }

    fn paint_projected(
        &mut self,
        entity: &Entity,
        origin: Point,
        projection: &Projection,
    ) -> Result<bool, RenderError> {
        let id = entity.id();
        let mut drawn = false;
        if let Some(color) = entity.color() {
            self.fill(id, projection.dest, color)?;
            drawn = true;
        }
        if self.options.debug_regions
            && let Err(err) = self.region_overlay(entity, origin)
        {
            debug!("region overlay failed: {err}");
        }
        if let Some(asset) = entity.texture() {
            let image = self.image(id, asset)?;
            let src = projection
                .source_rect(image_size(image), entity.size())
                .ok_or(RenderError::EmptyTarget { entity: id, asset })?;
            self.blit(id, asset, image, src, projection.dest)?;
            drawn = true;
        }
        Ok(drawn)
    }

    fn hud(&mut self, id: EntityId) {
        let scene = self.scene;
        let Some(entity) = scene.get(id) else {
            return;
        };
        if !entity.is_visible() {
            return;
        }
        self.stats.visited += 1;

        let result = self.paint_local(entity);
        self.record(result);

        for &child in entity.children() {
            self.hud(child);
        }
    }

    fn paint_local(&mut self, entity: &Entity) -> Result<bool, RenderError> {
        let id = entity.id();
        let dest = entity.local_bounds();
        let mut drawn = false;
        if let Some(color) = entity.color() {
            self.fill(id, dest, color)?;
            drawn = true;
        }
        if let Some(asset) = entity.texture() {
            let image = self.image(id, asset)?;
            let src = Rect::from_origin_size(Point::ZERO, image_size(image));
            self.blit(id, asset, image, src, dest)?;
            drawn = true;
        }
        Ok(drawn)
    }

    fn record(&mut self, result: Result<bool, RenderError>) {
        match result {
            Ok(true) => self.stats.drawn += 1,
            Ok(false) => {}
            Err(err) => {
                warn!("{err}");
                self.stats.failed += 1;
            }
        }
    }

    fn fill(&mut self, id: EntityId, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.surface
            .fill_rect(rect, color)
            .map_err(|source| RenderError::Surface { entity: id, source })
    }

    fn blit(
        &mut self,
        id: EntityId,
        asset: AssetId,
        image: ImageData<'_>,
        src: Rect,
        dst: Rect,
    ) -> Result<(), RenderError> {
        self.surface
            .draw_image(asset, image, src, dst)
            .map_err(|source| RenderError::Surface { entity: id, source })
    }

    fn image(&self, id: EntityId, asset: AssetId) -> Result<ImageData<'a>, RenderError> {
        let assets = self.assets;
        let found = assets
            .asset(asset)
            .ok_or(RenderError::MissingAsset { entity: id, asset })?;
        found
            .image()
            .ok_or(RenderError::NotAnImage { entity: id, asset })
    }

    fn camera_overlay(&mut self, camera: &Camera) -> Result<(), SurfaceError> {
        let render = camera.render_rect();
        self.surface
            .stroke_rect(camera.fov_rect(), debug_red(), DEBUG_LINE_WIDTH)?;
        self.surface.fill_rect(render, Color::BLACK)?;
        self.surface
            .stroke_rect(render, Color::from_rgb8(0, 255, 0), DEBUG_LINE_WIDTH)
    }

    /// Outline occupied buckets at the entity's position in scene space.
    fn region_overlay(&mut self, entity: &Entity, origin: Point) -> Result<(), SurfaceError> {
        let layout = entity.regions().layout();
        let bucket = Size::new(
            span_or(layout.bucket_width(), entity.width()),
            span_or(layout.bucket_height(), entity.height()),
        );
        for ((col, row), _) in entity.regions().occupied_buckets() {
            let offset = Vec2::new(
                f64::from(col) * bucket.width,
                f64::from(row) * bucket.height,
            );
            let rect = Rect::from_origin_size(origin + offset, bucket);
            self.surface.stroke_rect(rect, debug_red(), 1.0)?;
        }
        Ok(())
    }
}

fn debug_red() -> Color {
    Color::from_rgb8(255, 0, 0)
}

/// Degenerate axes have a zero bucket size and a single bucket spanning the entity.
fn span_or(bucket: f64, length: f64) -> f64 {
    if bucket > 0.0 { bucket } else { length }
}

fn image_size(image: ImageData<'_>) -> Size {
    Size::new(f64::from(image.width), f64::from(image.height))
}
