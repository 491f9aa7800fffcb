// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zen Region: a per-parent uniform bucket grid for child lookup.
//!
//! Every scene entity owns one [`RegionIndex`] over its children. The index
//! partitions the parent's local coordinate space into a grid of buckets,
//! records each child in every bucket its bounding box overlaps, and keeps a
//! reverse map from child to buckets so moves and removals stay incremental.
//!
//! - Rebuild wholesale when the parent is resized ([`RegionIndex::rebuild`]).
//! - Insert, [`relocate`](RegionIndex::relocate), and remove single children.
//! - Query by point (exact containment) or by region (bucket union).
//!
//! Bucket sizing follows a [`RegionPolicy`]: 50-unit buckets by default, with
//! axes of 100 units or less split in half. A zero-length axis collapses into
//! a single bucket spanning every coordinate, so the grid is never empty.
//!
//! Parts of a child lying outside the parent's declared extent are clipped
//! away. A child with no bucket in range is reported as
//! [`Placement::Unindexed`] and is not tracked at all.
//!
//! The crate does not depend on any geometry crate; higher layers convert
//! their rectangles to [`Aabb2D`].
//!
//! # Example
//!
//! ```rust
//! use zen_region::{Aabb2D, Placement, RegionIndex};
//!
//! let mut regions: RegionIndex<u32> = RegionIndex::new();
//! // A 200x200 parent gets a 4x4 grid of 50-unit buckets.
//! regions.rebuild(200.0, 200.0, [(1, Aabb2D::from_xywh(10.0, 10.0, 20.0, 20.0))]);
//! assert_eq!(regions.buckets_of(&1), Some(&[(0, 0)][..]));
//!
//! // Moving the child only touches the buckets involved.
//! let placed = regions.relocate(1, Aabb2D::from_xywh(190.0, 190.0, 20.0, 20.0));
//! assert_eq!(placed, Placement::Indexed(1));
//! assert_eq!(regions.buckets_of(&1), Some(&[(3, 3)][..]));
//!
//! let hits: Vec<_> = regions.query_point(195.0, 195.0).collect();
//! assert_eq!(hits, [1]);
//! ```
//!
//! ### Float semantics
//!
//! Coordinates are `f64`. Boxes with NaN corners are never indexed and points
//! with NaN coordinates never match.

#![no_std]

extern crate alloc;

mod index;
mod layout;
mod types;

pub use index::{Placement, RegionIndex};
pub use layout::{GridLayout, RegionPolicy};
pub use types::{Aabb2D, Bucket};
