// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications delivered to entity listeners.

use alloc::boxed::Box;

use kurbo::Point;

use crate::model::{Attribute, Value};
use crate::scene::Scene;
use crate::types::EntityId;

/// A change to an entity, delivered synchronously after the mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityEvent {
    /// The entity's position changed (or was re-set to the same value).
    LocationUpdate {
        /// The entity that moved.
        source: EntityId,
        /// Position before the update.
        old: Point,
        /// Position after the update.
        new: Point,
    },
    /// Any other attribute changed.
    AttributeChange {
        /// The entity that changed.
        source: EntityId,
        /// Which attribute.
        attribute: Attribute,
        /// New value; `None` when the attribute was cleared.
        value: Option<Value>,
        /// Previous value.
        old: Option<Value>,
    },
}

impl EntityEvent {
    /// The entity the event originated from.
    pub fn source(&self) -> EntityId {
        match self {
            Self::LocationUpdate { source, .. } | Self::AttributeChange { source, .. } => *source,
        }
    }
}

/// Callback invoked with the scene and the event.
///
/// Listeners may mutate the scene. While an entity's listeners run, further
/// events from that same entity are dropped.
pub type Listener = Box<dyn FnMut(&mut Scene, &EntityEvent)>;
