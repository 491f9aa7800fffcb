// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene arena: entity storage, tree structure and mutation.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};
use log::{debug, trace, warn};
use peniko::Color;
use zen_region::{Aabb2D, RegionIndex, RegionPolicy};

use crate::asset::{Asset, AssetKind};
use crate::entity::Entity;
use crate::error::SceneError;
use crate::event::EntityEvent;
use crate::model::{Attribute, AttributeMap, Model, Value, missing_geometry};
use crate::types::{EntityFlags, EntityId, ListenerId};
use crate::util::rect_to_aabb;

/// Arena owning every entity and their parent/child links.
///
/// Each entity keeps a [`RegionIndex`] over its children. The scene keeps
/// those indexes current: moving or resizing a child relocates it in its
/// parent's index, resizing an entity rebuilds its own index, and attaching or
/// detaching updates both sides at once.
///
/// Entities form a forest. Roots have no parent; any entity can be attached
/// under another with [`add_child`](Self::add_child).
///
/// ## Dirty tracking
///
/// Changes to width, height, color or texture flag the entity and all of its
/// ancestors as modified. Position changes and structural changes flag the
/// parent (and its ancestors). Flags stay set until
/// [`clear_modified`](Self::clear_modified), which the renderer calls after a
/// pass.
///
/// ## Stale ids
///
/// Setters called with a stale id do nothing. Fallible operations report
/// [`SceneError::StaleEntity`].
///
/// # Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use zen_scene::Scene;
///
/// let mut scene = Scene::new();
/// let root = scene.create(Rect::new(0.0, 0.0, 200.0, 200.0));
/// let child = scene.create(Rect::new(10.0, 10.0, 30.0, 30.0));
/// scene.add_child(root, child).unwrap();
///
/// assert_eq!(scene.find_top_child_at(root, Point::new(15.0, 15.0)), Some(child));
///
/// scene.set_coordinate(child, Point::new(190.0, 190.0));
/// assert_eq!(scene.find_top_child_at(root, Point::new(15.0, 15.0)), None);
/// assert!(scene.is_modified(root));
/// ```
pub struct Scene {
    /// slots
    entities: Vec<Option<Entity>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    policy: RegionPolicy,
    next_paint_key: u64,
    next_listener: u64,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("entities_total", &self.entities.len())
            .field("entities_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene using the default region policy.
    pub fn new() -> Self {
        Self::with_region_policy(RegionPolicy::DEFAULT)
    }

    /// Create an empty scene whose entities size their region grids with `policy`.
    pub fn with_region_policy(policy: RegionPolicy) -> Self {
        Self {
            entities: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            policy,
            next_paint_key: 0,
            next_listener: 0,
        }
    }

    /// Bucket sizing policy applied to every entity's region index.
    pub fn region_policy(&self) -> RegionPolicy {
        self.policy
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len() - self.free_list.len()
    }

    /// True if the scene holds no entity.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// The entity behind `id`, if live.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|entity| entity.id == id)
    }

    /// Iterate over all live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter_map(|slot| slot.as_ref())
    }

    /// Iterate over entities without a parent.
    pub fn roots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().filter(|e| e.parent.is_none()).map(|e| e.id)
    }

    /// Create a root entity covering `bounds`, with default attributes otherwise.
    pub fn create(&mut self, bounds: Rect) -> EntityId {
        let bounds = bounds.abs();
        let model = AttributeMap::with_defaults()
            .with(Attribute::X, Value::Number(bounds.x0))
            .with(Attribute::Y, Value::Number(bounds.y0))
            .with(Attribute::Width, Value::Number(bounds.width()))
            .with(Attribute::Height, Value::Number(bounds.height()));
        self.allocate(Box::new(model))
    }

    /// Create a root entity at the origin with zero size.
    pub fn create_default(&mut self) -> EntityId {
        self.allocate(Box::new(AttributeMap::with_defaults()))
    }

    /// Create a root entity backed by `model`.
    ///
    /// Fails with [`SceneError::MissingModel`] if the model lacks a numeric
    /// `X`, `Y`, `Width` or `Height`.
    pub fn insert_with_model(&mut self, model: Box<dyn Model>) -> Result<EntityId, SceneError> {
        if let Some(attribute) = missing_geometry(&*model) {
            return Err(SceneError::MissingModel { attribute });
        }
        Ok(self.allocate(model))
    }

    fn allocate(&mut self, model: Box<dyn Model>) -> EntityId {
        let regions = RegionIndex::with_policy(self.policy);
        let id = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntityId uses 32-bit indices by design."
            )]
            let id = EntityId::new(idx as u32, generation);
            self.entities[idx] = Some(Entity::new(id, model, regions));
            id
        } else {
            let generation = 1_u32;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntityId uses 32-bit indices by design."
            )]
            let id = EntityId::new(self.entities.len() as u32, generation);
            self.entities.push(Some(Entity::new(id, model, regions)));
            self.generations.push(generation);
            id
        };
        self.rebuild_regions(id);
        id
    }

    /// Remove an entity and its whole subtree from the scene.
    ///
    /// The entity is detached from its parent first. All removed ids go stale.
    /// Returns false if `id` was already stale.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.parent_of(id) {
            self.remove_child(parent, id);
        }
        let mut removed = 0_usize;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entities[current.idx()].take() {
                stack.extend_from_slice(&entity.children);
                self.free_list.push(current.idx());
                removed += 1;
            }
        }
        debug!("destroyed {id:?} and its subtree ({removed} entities)");
        true
    }

    // --- structure ---

    /// Attach `child` under `parent`, on top of its existing siblings.
    ///
    /// The child is first detached from its current parent, if any (even when
    /// that is `parent` itself, which moves it to the top). It is then inserted
    /// into `parent`'s region index. A child lying entirely outside the
    /// parent's extent stays attached but is not indexed.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), SceneError> {
        if !self.is_alive(parent) {
            return Err(SceneError::StaleEntity(parent));
        }
        if !self.is_alive(child) {
            return Err(SceneError::StaleEntity(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::WouldCycle { parent, child });
        }
        if let Some(old) = self.parent_of(child) {
            self.remove_child(old, child);
        }

        let paint_key = self.next_paint_key;
        self.next_paint_key += 1;
        let bounds = {
            let c = self.node_mut(child);
            c.parent = Some(parent);
            c.paint_key = paint_key;
            rect_to_aabb(c.local_bounds())
        };

        let last_key = self
            .node(parent)
            .children
            .last()
            .map(|&last| self.node(last).paint_key);
        self.node_mut(parent).children.push(child);
        if last_key.is_some_and(|k| k > paint_key) {
            self.restack(parent);
        }

        self.index_child(parent, child, bounds);
        self.mark_modified(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive as a new root.
    ///
    /// Returns false if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if !self.is_alive(parent) || self.parent_of(child) != Some(parent) {
            return false;
        }
        let p = self.node_mut(parent);
        p.children.retain(|&c| c != child);
        p.regions.remove(&child);
        self.node_mut(child).parent = None;
        self.mark_modified(parent);
        true
    }

    /// Detach every child of `parent`.
    pub fn remove_all_children(&mut self, parent: EntityId) {
        let Some(p) = self.entity_mut(parent) else {
            return;
        };
        if p.children.is_empty() {
            return;
        }
        let children = core::mem::take(&mut p.children);
        p.regions.clear();
        for child in children {
            if let Some(c) = self.entity_mut(child) {
                c.parent = None;
            }
        }
        self.mark_modified(parent);
    }

    /// Returns the parent of an entity, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Children of an entity in paint order, or an empty slice if stale.
    pub fn children_of(&self, id: EntityId) -> &[EntityId] {
        match self.get(id) {
            Some(entity) => &entity.children,
            None => &[],
        }
    }

    /// Restack `id` among its siblings.
    ///
    /// Children paint (and are hit-tested in reverse) in ascending key order.
    /// Appended children get increasing keys, so by default paint order is
    /// insertion order. A child appended after a key was raised may sort below
    /// it. Returns false for stale ids.
    pub fn set_paint_key(&mut self, id: EntityId, key: u64) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        entity.paint_key = key;
        if let Some(parent) = entity.parent {
            self.restack(parent);
            self.mark_modified(parent);
        }
        true
    }

    fn restack(&mut self, parent: EntityId) {
        let mut keyed: Vec<(u64, EntityId)> = self
            .node(parent)
            .children
            .iter()
            .map(|&c| (self.node(c).paint_key, c))
            .collect();
        keyed.sort_by_key(|&(key, _)| key);
        self.node_mut(parent).children = keyed.into_iter().map(|(_, c)| c).collect();
    }

    fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    // --- dirty tracking ---

    /// Whether `id` or anything below it changed visually since the last clear.
    pub fn is_modified(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Entity::is_modified)
    }

    /// Clear the modified flag on `id` and its whole subtree.
    pub fn clear_modified(&mut self, id: EntityId) {
        if !self.is_alive(id) {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let entity = self.node_mut(current);
            entity.flags.remove(EntityFlags::MODIFIED);
            stack.extend_from_slice(&entity.children);
        }
    }

    fn mark_modified(&mut self, id: EntityId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(entity) = self.entity_mut(c) else {
                break;
            };
            entity.flags.insert(EntityFlags::MODIFIED);
            current = entity.parent;
        }
    }

    // --- geometry ---

    /// Set the horizontal position relative to the parent.
    pub fn set_x(&mut self, id: EntityId, x: f64) {
        self.move_to(id, Some(x), None);
    }

    /// Set the vertical position relative to the parent.
    pub fn set_y(&mut self, id: EntityId, y: f64) {
        self.move_to(id, None, Some(y));
    }

    /// Set both coordinates with a single region update and notification.
    pub fn set_coordinate(&mut self, id: EntityId, coordinate: Point) {
        self.move_to(id, Some(coordinate.x), Some(coordinate.y));
    }

    /// Alias of [`set_coordinate`](Self::set_coordinate).
    pub fn set_location(&mut self, id: EntityId, location: Point) {
        self.set_coordinate(id, location);
    }

    fn move_to(&mut self, id: EntityId, x: Option<f64>, y: Option<f64>) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let old = entity.coordinate();
        if let Some(x) = x {
            entity.model.set_attribute(Attribute::X, Value::Number(x));
        }
        if let Some(y) = y {
            entity.model.set_attribute(Attribute::Y, Value::Number(y));
        }
        let new = entity.coordinate();
        let parent = entity.parent;

        self.sync_parent_region(id);
        if let Some(parent) = parent {
            self.mark_modified(parent);
        }
        self.emit(id, EntityEvent::LocationUpdate {
            source: id,
            old,
            new,
        });
    }

    /// Set the width and rebuild this entity's region index.
    pub fn set_width(&mut self, id: EntityId, width: f64) {
        self.change(id, Attribute::Width, Some(Value::Number(width)));
    }

    /// Set the height and rebuild this entity's region index.
    pub fn set_height(&mut self, id: EntityId, height: f64) {
        self.change(id, Attribute::Height, Some(Value::Number(height)));
    }

    /// Set width and height with a single region rebuild.
    pub fn set_size(&mut self, id: EntityId, size: Size) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let width = Value::Number(size.width);
        let height = Value::Number(size.height);
        let old_width = entity.model.set_attribute(Attribute::Width, width.clone());
        let old_height = entity.model.set_attribute(Attribute::Height, height.clone());
        self.resized(id);
        self.emit(id, EntityEvent::AttributeChange {
            source: id,
            attribute: Attribute::Width,
            value: Some(width),
            old: old_width,
        });
        self.emit(id, EntityEvent::AttributeChange {
            source: id,
            attribute: Attribute::Height,
            value: Some(height),
            old: old_height,
        });
    }

    fn resized(&mut self, id: EntityId) {
        self.rebuild_regions(id);
        self.sync_parent_region(id);
        self.mark_modified(id);
    }

    /// Recompute the grid of `id` and re-place every child.
    fn rebuild_regions(&mut self, id: EntityId) {
        let Some(entity) = self.get(id) else {
            return;
        };
        let (width, height) = (entity.width(), entity.height());
        let placed: Vec<(EntityId, Aabb2D)> = entity
            .children
            .iter()
            .filter_map(|&c| self.get(c).map(|e| (c, rect_to_aabb(e.local_bounds()))))
            .collect();

        let entity = self.node_mut(id);
        let unindexed = entity.regions.rebuild(width, height, placed);
        let layout = entity.regions.layout();
        trace!(
            "rebuilt regions of {id:?}: {}x{} buckets of {}x{}",
            layout.cols(),
            layout.rows(),
            layout.bucket_width(),
            layout.bucket_height()
        );
        for child in unindexed {
            warn!("child {child:?} lies outside {id:?} and was left out of its region index");
        }
    }

    /// Re-place `id` in its parent's region index.
    fn sync_parent_region(&mut self, id: EntityId) {
        let Some(entity) = self.get(id) else {
            return;
        };
        let Some(parent) = entity.parent else {
            return;
        };
        let bounds = rect_to_aabb(entity.local_bounds());
        self.index_child(parent, id, bounds);
    }

    fn index_child(&mut self, parent: EntityId, child: EntityId, bounds: Aabb2D) {
        let Some(p) = self.entity_mut(parent) else {
            return;
        };
        if !p.regions.relocate(child, bounds).is_indexed() {
            warn!("child {child:?} lies outside {parent:?} and was left out of its region index");
        }
    }

    // --- attributes ---

    /// Set the advisory depth.
    pub fn set_z(&mut self, id: EntityId, z: f64) {
        self.change(id, Attribute::Z, Some(Value::Number(z)));
    }

    /// Show or hide the entity and its subtree.
    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        self.change(id, Attribute::Visible, Some(Value::Bool(visible)));
    }

    /// Set or clear the flat fill color.
    pub fn set_color(&mut self, id: EntityId, color: Option<Color>) {
        self.change(id, Attribute::Color, color.map(Value::Color));
    }

    /// Use `asset` as the entity's texture.
    ///
    /// Only image assets are accepted; anything else fails with
    /// [`SceneError::InvalidAssetType`] and leaves the entity unchanged.
    pub fn set_texture(&mut self, id: EntityId, asset: &dyn Asset) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleEntity(id));
        }
        let found = asset.kind();
        if found != AssetKind::Image {
            return Err(SceneError::InvalidAssetType {
                asset: asset.id(),
                found,
            });
        }
        self.change(id, Attribute::Texture, Some(Value::Texture(asset.id())));
        Ok(())
    }

    /// Remove the texture.
    pub fn clear_texture(&mut self, id: EntityId) {
        self.change(id, Attribute::Texture, None);
    }

    /// Set the application type tag.
    pub fn set_kind(&mut self, id: EntityId, kind: impl Into<String>) {
        self.change(id, Attribute::Kind, Some(Value::Text(kind.into())));
    }

    /// Flag the entity for the application's collision checks.
    pub fn set_collisionable(&mut self, id: EntityId, collisionable: bool) {
        if let Some(entity) = self.entity_mut(id) {
            entity.flags.set(EntityFlags::COLLISIONABLE, collisionable);
        }
    }

    /// Set any attribute, applying the same rules as the typed setters.
    ///
    /// The value must match the attribute's type (numbers for geometry and
    /// depth, a bool for visibility and so on); custom attributes accept any
    /// value. Textures are rejected with
    /// [`SceneError::InvalidAttributeValue`]: only
    /// [`set_texture`](Self::set_texture) can check the asset kind.
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        attribute: Attribute,
        value: Value,
    ) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleEntity(id));
        }
        if attribute == Attribute::Texture || !attribute.accepts(&value) {
            return Err(SceneError::InvalidAttributeValue { attribute });
        }
        if attribute.marks_parent() {
            let position = value.as_number();
            match attribute {
                Attribute::X => self.move_to(id, position, None),
                _ => self.move_to(id, None, position),
            }
        } else {
            self.change(id, attribute, Some(value));
        }
        Ok(())
    }

    /// Replace the backing model.
    ///
    /// The new model must provide numeric geometry, as for
    /// [`insert_with_model`](Self::insert_with_model). The entity is rebuilt
    /// from the new geometry and marked modified.
    pub fn set_model(&mut self, id: EntityId, model: Box<dyn Model>) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::StaleEntity(id));
        }
        if let Some(attribute) = missing_geometry(&*model) {
            return Err(SceneError::MissingModel { attribute });
        }
        self.node_mut(id).model = model;
        self.resized(id);
        if let Some(parent) = self.parent_of(id) {
            self.mark_modified(parent);
        }
        Ok(())
    }

    /// Store (or with `None`, remove) an attribute and apply its side effects.
    fn change(&mut self, id: EntityId, attribute: Attribute, value: Option<Value>) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let old = match &value {
            Some(v) => entity.model.set_attribute(attribute.clone(), v.clone()),
            None => entity.model.remove_attribute(&attribute),
        };
        match attribute {
            Attribute::Width | Attribute::Height => self.resized(id),
            _ if attribute.marks_self() => self.mark_modified(id),
            _ => {}
        }
        self.emit(id, EntityEvent::AttributeChange {
            source: id,
            attribute,
            value,
            old,
        });
    }

    // --- listeners ---

    /// Register a listener for changes to `id`.
    ///
    /// Returns `None` for stale ids.
    pub fn subscribe<F>(&mut self, id: EntityId, listener: F) -> Option<ListenerId>
    where
        F: FnMut(&mut Self, &EntityEvent) + 'static,
    {
        let listener_id = ListenerId(self.next_listener);
        let entity = self.entity_mut(id)?;
        entity.listeners.push((listener_id, Box::new(listener)));
        self.next_listener += 1;
        Some(listener_id)
    }

    /// Remove a listener.
    ///
    /// Called from inside one of the entity's own listeners, the removal takes
    /// effect once the current event has been delivered.
    pub fn unsubscribe(&mut self, id: EntityId, listener: ListenerId) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        let before = entity.listeners.len();
        entity.listeners.retain(|(l, _)| *l != listener);
        if entity.listeners.len() != before {
            return true;
        }
        if entity.flags.contains(EntityFlags::EMITTING) {
            entity.dropped_listeners.push(listener);
            return true;
        }
        false
    }

    /// Deliver `event` to the listeners of `id`.
    ///
    /// Events raised by `id` while its listeners run are dropped.
    fn emit(&mut self, id: EntityId, event: EntityEvent) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        if entity.listeners.is_empty() || entity.flags.contains(EntityFlags::EMITTING) {
            return;
        }
        entity.flags.insert(EntityFlags::EMITTING);
        let mut listeners = core::mem::take(&mut entity.listeners);
        for (_, listener) in &mut listeners {
            listener(self, &event);
        }

        // A listener may have destroyed the entity.
        if let Some(entity) = self.entity_mut(id) {
            let added = core::mem::replace(&mut entity.listeners, listeners);
            entity.listeners.extend(added);
            let dropped = core::mem::take(&mut entity.dropped_listeners);
            entity.listeners.retain(|(l, _)| !dropped.contains(l));
            entity.flags.remove(EntityFlags::EMITTING);
        }
    }

    // --- internals ---

    pub(crate) fn node(&self, id: EntityId) -> &Entity {
        self.get(id).expect("dangling EntityId")
    }

    fn node_mut(&mut self, id: EntityId) -> &mut Entity {
        self.entity_mut(id).expect("dangling EntityId")
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .get_mut(id.idx())?
            .as_mut()
            .filter(|entity| entity.id == id)
    }
}
