// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle and flag types for the scene.

/// Identifier for an entity in a [`Scene`](crate::Scene) (generational).
///
/// Ids of destroyed entities go stale: the slot may be reused, but the old id
/// never resolves to the new occupant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this id. Only meaningful together with [`generation`](Self::generation).
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of the slot at the time this id was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Identifier for a registered change listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub(crate) u64);

bitflags::bitflags! {
    /// Per-entity bookkeeping flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u8 {
        /// A visual change happened in this entity or below since the flag was last cleared.
        const MODIFIED      = 0b0000_0001;
        /// Entity takes part in collision checks run by the application.
        const COLLISIONABLE = 0b0000_0010;
        /// Listeners of this entity are currently running.
        const EMITTING      = 0b0000_0100;
    }
}
