// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity storage and read accessors.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use zen_region::RegionIndex;

use crate::asset::AssetId;
use crate::event::Listener;
use crate::model::{Attribute, Model, Value};
use crate::types::{EntityFlags, EntityId, ListenerId};

/// A positioned rectangle in the scene tree.
///
/// Entities are owned by a [`Scene`](crate::Scene) and only handed out by
/// shared reference; every mutation goes through the scene so that region
/// indexes, dirty flags and listeners stay in sync.
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) model: Box<dyn Model>,
    pub(crate) parent: Option<EntityId>,
    /// Sorted by ascending paint key.
    pub(crate) children: Vec<EntityId>,
    pub(crate) paint_key: u64,
    pub(crate) regions: RegionIndex<EntityId>,
    pub(crate) flags: EntityFlags,
    pub(crate) listeners: Vec<(ListenerId, Listener)>,
    /// Listeners removed while they were detached for emission.
    pub(crate) dropped_listeners: Vec<ListenerId>,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("bounds", &self.local_bounds())
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("paint_key", &self.paint_key)
            .field("flags", &self.flags)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Entity {
    pub(crate) fn new(id: EntityId, model: Box<dyn Model>, regions: RegionIndex<EntityId>) -> Self {
        Self {
            id,
            model,
            parent: None,
            children: Vec::new(),
            paint_key: 0,
            regions,
            flags: EntityFlags::empty(),
            listeners: Vec::new(),
            dropped_listeners: Vec::new(),
        }
    }

    fn number(&self, attribute: &Attribute) -> f64 {
        self.model
            .attribute(attribute)
            .and_then(Value::as_number)
            .unwrap_or(0.0)
    }

    /// This entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The backing attribute store.
    pub fn model(&self) -> &dyn Model {
        &*self.model
    }

    /// Raw attribute lookup.
    pub fn attribute(&self, attribute: &Attribute) -> Option<&Value> {
        self.model.attribute(attribute)
    }

    /// Horizontal position relative to the parent.
    pub fn x(&self) -> f64 {
        self.number(&Attribute::X)
    }

    /// Vertical position relative to the parent.
    pub fn y(&self) -> f64 {
        self.number(&Attribute::Y)
    }

    /// Advisory depth.
    pub fn z(&self) -> f64 {
        self.number(&Attribute::Z)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.number(&Attribute::Width)
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.number(&Attribute::Height)
    }

    /// Right edge in the parent's space (`x + width`).
    pub fn x2(&self) -> f64 {
        self.x() + self.width()
    }

    /// Bottom edge in the parent's space (`y + height`).
    pub fn y2(&self) -> f64 {
        self.y() + self.height()
    }

    /// Top-left corner in the parent's space.
    pub fn coordinate(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    /// Alias of [`coordinate`](Self::coordinate).
    pub fn location(&self) -> Point {
        self.coordinate()
    }

    /// Bottom-right corner in the parent's space.
    pub fn outer_coordinate(&self) -> Point {
        Point::new(self.x2(), self.y2())
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Bounding box in the parent's space.
    pub fn local_bounds(&self) -> Rect {
        Rect::new(self.x(), self.y(), self.x2(), self.y2())
    }

    /// Whether the entity is drawn. Defaults to `true` when unset.
    pub fn is_visible(&self) -> bool {
        self.model
            .attribute(&Attribute::Visible)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Flat fill color, if any.
    pub fn color(&self) -> Option<Color> {
        self.model
            .attribute(&Attribute::Color)
            .and_then(Value::as_color)
    }

    /// Texture asset, if any.
    pub fn texture(&self) -> Option<AssetId> {
        self.model
            .attribute(&Attribute::Texture)
            .and_then(Value::as_texture)
    }

    /// Application type tag, if any.
    pub fn kind(&self) -> Option<&str> {
        self.model.attribute(&Attribute::Kind).and_then(Value::as_text)
    }

    /// Parent entity, `None` for roots.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in paint order (first paints at the bottom).
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Child at `index` in paint order.
    pub fn child_at(&self, index: usize) -> Option<EntityId> {
        self.children.get(index).copied()
    }

    /// Position of `child` in paint order.
    pub fn index_of(&self, child: EntityId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Whether `child` is a direct child.
    pub fn is_child(&self, child: EntityId) -> bool {
        self.index_of(child).is_some()
    }

    /// Key ordering this entity among its siblings.
    pub fn paint_key(&self) -> u64 {
        self.paint_key
    }

    /// Region index over the children.
    pub fn regions(&self) -> &RegionIndex<EntityId> {
        &self.regions
    }

    /// Bookkeeping flags.
    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Whether a visual change happened here or below since the last clear.
    pub fn is_modified(&self) -> bool {
        self.flags.contains(EntityFlags::MODIFIED)
    }

    /// Whether the application flagged this entity for collision checks.
    pub fn is_collisionable(&self) -> bool {
        self.flags.contains(EntityFlags::COLLISIONABLE)
    }
}
