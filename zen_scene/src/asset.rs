// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture assets as seen by the scene and the renderer.
//!
//! Loading and caching assets is the application's job. Entities only hold an
//! [`AssetId`]; the renderer resolves it through an [`AssetSource`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

/// Identifier of an asset held by an external cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u32);

/// What kind of data an asset holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Decoded pixels; the only kind accepted as a texture.
    Image,
    /// Sound data.
    Audio,
    /// Anything else.
    Data,
}

/// Borrowed view of an image asset's pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageData<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel bytes, in whatever layout the drawing surface expects.
    pub pixels: &'a [u8],
}

/// An asset owned by an external cache.
pub trait Asset: Debug {
    /// Identifier of this asset.
    fn id(&self) -> AssetId;

    /// Kind of data held.
    fn kind(&self) -> AssetKind;

    /// Pixel data, for image assets.
    fn image(&self) -> Option<ImageData<'_>>;
}

impl<A: Asset + ?Sized> Asset for Box<A> {
    fn id(&self) -> AssetId {
        (**self).id()
    }

    fn kind(&self) -> AssetKind {
        (**self).kind()
    }

    fn image(&self) -> Option<ImageData<'_>> {
        (**self).image()
    }
}

/// Resolves asset ids at render time.
pub trait AssetSource {
    /// The asset registered under `id`, if any.
    fn asset(&self, id: AssetId) -> Option<&dyn Asset>;
}

impl<A: Asset> AssetSource for HashMap<AssetId, A> {
    fn asset(&self, id: AssetId) -> Option<&dyn Asset> {
        self.get(&id).map(|a| a as &dyn Asset)
    }
}

impl<A: Asset> AssetSource for [A] {
    fn asset(&self, id: AssetId) -> Option<&dyn Asset> {
        self.iter().find(|a| a.id() == id).map(|a| a as &dyn Asset)
    }
}

impl<A: Asset> AssetSource for Vec<A> {
    fn asset(&self, id: AssetId) -> Option<&dyn Asset> {
        self.as_slice().asset(id)
    }
}

/// An asset with its bytes held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryAsset {
    id: AssetId,
    kind: AssetKind,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl MemoryAsset {
    /// An image asset of `width` x `height` pixels.
    pub fn image(id: AssetId, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            id,
            kind: AssetKind::Image,
            width,
            height,
            bytes: pixels,
        }
    }

    /// A non-image asset.
    pub fn blob(id: AssetId, kind: AssetKind, bytes: Vec<u8>) -> Self {
        Self {
            id,
            kind,
            width: 0,
            height: 0,
            bytes,
        }
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Asset for MemoryAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn kind(&self) -> AssetKind {
        self.kind
    }

    fn image(&self) -> Option<ImageData<'_>> {
        (self.kind == AssetKind::Image).then(|| ImageData {
            width: self.width,
            height: self.height,
            pixels: &self.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn only_images_expose_pixels() {
        let img = MemoryAsset::image(AssetId(1), 2, 1, vec![0; 8]);
        let snd = MemoryAsset::blob(AssetId(2), AssetKind::Audio, vec![1, 2, 3]);
        assert_eq!(img.image().map(|d| (d.width, d.height)), Some((2, 1)));
        assert!(snd.image().is_none());
        assert_eq!(snd.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn sources_resolve_by_id() {
        let assets = vec![
            MemoryAsset::image(AssetId(7), 1, 1, vec![0; 4]),
            MemoryAsset::blob(AssetId(9), AssetKind::Data, Vec::new()),
        ];
        assert_eq!(assets.asset(AssetId(9)).map(|a| a.kind()), Some(AssetKind::Data));
        assert!(assets.asset(AssetId(3)).is_none());

        let mut map: HashMap<AssetId, Box<dyn Asset>> = HashMap::new();
        map.insert(
            AssetId(7),
            Box::new(MemoryAsset::image(AssetId(7), 1, 1, vec![0; 4])),
        );
        assert_eq!(map.asset(AssetId(7)).map(|a| a.id()), Some(AssetId(7)));
    }
}
