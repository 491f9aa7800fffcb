// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

use kurbo::Rect;
use peniko::Color;
use zen_scene::{AssetId, ImageData};

/// Drawing primitives the pipeline needs from an output surface.
///
/// All rectangles are in surface pixels, except the `src` rectangle of
/// [`draw_image`](Self::draw_image), which is in image pixels.
pub trait Surface {
    /// Fill `rect` with a flat color.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    /// Outline `rect` with a line of `width` pixels. Used for debug overlays.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) -> Result<(), SurfaceError>;

    /// Draw the `src` part of `image` stretched over `dst`.
    fn draw_image(
        &mut self,
        asset: AssetId,
        image: ImageData<'_>,
        src: Rect,
        dst: Rect,
    ) -> Result<(), SurfaceError>;
}

/// Failure reported by a [`Surface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backend failed; the message is backend specific.
    Backend(String),
    /// The backend cannot draw this image (format, size, ...).
    UnsupportedImage,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "surface backend error: {message}"),
            Self::UnsupportedImage => f.write_str("image not supported by the surface"),
        }
    }
}

impl core::error::Error for SurfaceError {}
