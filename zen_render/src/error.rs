// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use zen_scene::{AssetId, EntityId};

use crate::surface::SurfaceError;

/// Why a single entity could not be drawn.
///
/// These never abort a pass: the pipeline logs them, counts them in
/// [`FrameStats::failed`](crate::FrameStats::failed) and moves on.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderError {
    /// The surface rejected a draw call.
    Surface {
        /// Entity being drawn.
        entity: EntityId,
        /// Underlying error.
        source: SurfaceError,
    },
    /// The entity's texture is not known to the asset source.
    MissingAsset {
        /// Entity being drawn.
        entity: EntityId,
        /// Texture it refers to.
        asset: AssetId,
    },
    /// The entity's texture does not hold pixels.
    NotAnImage {
        /// Entity being drawn.
        entity: EntityId,
        /// Texture it refers to.
        asset: AssetId,
    },
    /// The entity has no area to stretch its texture over.
    EmptyTarget {
        /// Entity being drawn.
        entity: EntityId,
        /// Texture it refers to.
        asset: AssetId,
    },
}

impl RenderError {
    /// The entity that failed to draw.
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Surface { entity, .. }
            | Self::MissingAsset { entity, .. }
            | Self::NotAnImage { entity, .. }
            | Self::EmptyTarget { entity, .. } => *entity,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface { entity, source } => write!(f, "drawing {entity:?} failed: {source}"),
            Self::MissingAsset { entity, asset } => {
                write!(f, "texture {asset:?} of {entity:?} is not loaded")
            }
            Self::NotAnImage { entity, asset } => {
                write!(f, "texture {asset:?} of {entity:?} is not an image")
            }
            Self::EmptyTarget { entity, asset } => {
                write!(f, "{entity:?} has no area to draw texture {asset:?} on")
            }
        }
    }
}

impl core::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Surface { source, .. } => Some(source),
            _ => None,
        }
    }
}
