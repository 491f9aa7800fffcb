// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zen Scene: a tree of positioned rectangles with per-entity child indexing.
//!
//! A [`Scene`] owns every [`Entity`]. Each entity has a position relative to
//! its parent, a size, optional appearance (flat [`Color`](peniko::Color)
//! and/or a texture [`AssetId`]) and an ordered list of children. Children
//! paint in insertion order unless restacked with
//! [`Scene::set_paint_key`].
//!
//! Every entity owns a [`zen_region::RegionIndex`] over its children, kept in
//! step with every mutation. Hit-testing uses it:
//!
//! - [`Scene::children_at`] / [`Scene::children_in`]: direct children by point
//!   (exact) or by rectangle (bucket-coarse).
//! - [`Scene::find_children_at`] / [`Scene::find_children_in`]: exact,
//!   recursive, depth first.
//! - [`Scene::find_top_child_at`]: deepest topmost entity under a point.
//!
//! Entity attributes live in a [`Model`]. [`AttributeMap`] is the default; any
//! model providing numeric `X`, `Y`, `Width` and `Height` may be used.
//!
//! Changes are announced synchronously to listeners registered with
//! [`Scene::subscribe`] as [`EntityEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use peniko::Color;
//! use zen_scene::Scene;
//!
//! let mut scene = Scene::new();
//! let world = scene.create(Rect::new(0.0, 0.0, 400.0, 300.0));
//! let house = scene.create(Rect::new(100.0, 100.0, 200.0, 200.0));
//! let door = scene.create(Rect::new(40.0, 60.0, 60.0, 100.0));
//! scene.add_child(world, house).unwrap();
//! scene.add_child(house, door).unwrap();
//! scene.set_color(door, Some(Color::from_rgb8(120, 60, 20)));
//!
//! // Queries are in the searched entity's local space.
//! assert_eq!(scene.find_top_child_at(world, Point::new(150.0, 180.0)), Some(door));
//! assert_eq!(scene.find_children_at(world, Point::new(150.0, 180.0)), [house, door]);
//! assert_eq!(scene.absolute_position(door), Some(Point::new(140.0, 160.0)));
//!
//! // Visual changes flag the entity and its ancestors until cleared.
//! assert!(scene.is_modified(world));
//! scene.clear_modified(world);
//! assert!(!scene.is_modified(house));
//! ```
//!
//! ### Float semantics
//!
//! Coordinates are `f64`. A child whose box falls entirely outside its
//! parent's `0..width` x `0..height` extent stays attached and is still drawn,
//! but queries do not find it.

#![no_std]

extern crate alloc;

mod asset;
mod entity;
mod error;
mod event;
mod model;
mod query;
mod scene;
mod types;
mod util;

pub use asset::{Asset, AssetId, AssetKind, AssetSource, ImageData, MemoryAsset};
pub use entity::Entity;
pub use error::SceneError;
pub use event::{EntityEvent, Listener};
pub use model::{Attribute, AttributeMap, Model, Value};
pub use scene::Scene;
pub use types::{EntityFlags, EntityId, ListenerId};

pub use zen_region::{GridLayout, RegionIndex, RegionPolicy};
