// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Surface`] that records draw calls instead of rasterizing.
//!
//! Meant for tests and debugging that want to assert on the exact calls a
//! pass emits.

use alloc::format;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Color;
use zen_scene::{AssetId, ImageData};

use crate::surface::{Surface, SurfaceError};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`Surface::fill_rect`].
    FillRect {
        /// Destination.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// [`Surface::stroke_rect`].
    StrokeRect {
        /// Outlined rectangle.
        rect: Rect,
        /// Line color.
        color: Color,
        /// Line width.
        width: f64,
    },
    /// [`Surface::draw_image`].
    DrawImage {
        /// Image drawn.
        asset: AssetId,
        /// Source rectangle in image pixels.
        src: Rect,
        /// Destination rectangle.
        dst: Rect,
    },
}

/// Surface recording every call as a [`DrawCommand`].
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    failing: Vec<AssetId>,
}

impl RecordingSurface {
    /// An empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in call order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recording empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Forget recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Make every later [`draw_image`](Surface::draw_image) of `asset` fail.
    pub fn fail_on(&mut self, asset: AssetId) {
        self.failing.push(asset);
    }

    /// Recorded fills only.
    pub fn fills(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) -> Result<(), SurfaceError> {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
        Ok(())
    }

    fn draw_image(
        &mut self,
        asset: AssetId,
        _image: ImageData<'_>,
        src: Rect,
        dst: Rect,
    ) -> Result<(), SurfaceError> {
        if self.failing.contains(&asset) {
            return Err(SurfaceError::Backend(format!("refusing to draw {asset:?}")));
        }
        self.commands.push(DrawCommand::DrawImage { asset, src, dst });
        Ok(())
    }
}
