// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zen Render: draws Zen scenes through cameras onto a [`Surface`].
//!
//! A [`Camera`] maps a field of view in scene space onto an output rectangle.
//! Each frame the pipeline walks every camera's scene in paint order:
//!
//! 1. Cull: entities not overlapping the field of view are skipped together
//!    with their subtrees.
//! 2. Clip and scale: the visible part of the entity is mapped into the
//!    output rectangle ([`project`]).
//! 3. Draw: fill color, then the texture, sampling only the visible part of
//!    the image.
//! 4. Descend into every child, indexed or not.
//!
//! An optional HUD entity is drawn last, in surface coordinates.
//!
//! Drawing goes through the [`Surface`] trait; [`RecordingSurface`] records
//! the calls for tests.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use peniko::Color;
//! use zen_render::{Camera, DrawCommand, RecordingSurface, RenderingEngine};
//! use zen_scene::{MemoryAsset, Scene};
//!
//! let mut scene = Scene::new();
//! let world = scene.create(Rect::new(0.0, 0.0, 1000.0, 1000.0));
//! let tile = scene.create(Rect::new(50.0, 50.0, 90.0, 90.0));
//! scene.add_child(world, tile).unwrap();
//! scene.set_color(tile, Some(Color::WHITE));
//!
//! // Look at 100x100 units of the world through a 50x50 pixel window.
//! let mut engine = RenderingEngine::new();
//! engine.add_camera(Camera::new(
//!     world,
//!     Point::ZERO,
//!     Size::new(100.0, 100.0),
//!     Point::ZERO,
//!     Size::new(50.0, 50.0),
//! ));
//!
//! let mut surface = RecordingSurface::new();
//! let assets: Vec<MemoryAsset> = Vec::new();
//! let stats = engine.render(&mut scene, &assets, &mut surface);
//!
//! assert_eq!(stats.drawn, 1);
//! assert_eq!(
//!     surface.commands(),
//!     [DrawCommand::FillRect {
//!         rect: Rect::new(25.0, 25.0, 45.0, 45.0),
//!         color: Color::WHITE,
//!     }]
//! );
//! assert!(!scene.is_modified(world));
//! ```

#![no_std]

extern crate alloc;

mod camera;
mod engine;
mod error;
mod projection;
mod recording;
mod surface;

pub use camera::Camera;
pub use engine::{FrameStats, RenderOptions, RenderingEngine, render_frame};
pub use error::RenderError;
pub use projection::{Clip, Projection, overlaps, project};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{Surface, SurfaceError};
