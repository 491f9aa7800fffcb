// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The region index: bucket grid, reverse membership map, and queries.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::layout::{GridLayout, RegionPolicy};
use crate::types::{Aabb2D, Bucket};

/// Outcome of placing a key into the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The key was recorded in this many buckets.
    Indexed(usize),
    /// No bucket of the key's bounds lies inside the grid (or the bounds are NaN).
    ///
    /// The key is not tracked at all; point and region queries will not find it.
    Unindexed,
}

impl Placement {
    /// Whether the key ended up in at least one bucket.
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed(_))
    }
}

#[derive(Clone, Debug)]
struct Member {
    bounds: Aabb2D,
    // Buckets currently containing this key.
    buckets: SmallVec<[Bucket; 4]>,
}

/// Uniform bucket grid over a parent's local space.
///
/// Each key is stored in every bucket its bounding box overlaps, and a reverse
/// map remembers those buckets so that removal and moves touch only the cells
/// involved. The grid extent comes from the parent's size (see
/// [`RegionPolicy`]); parts of a box that fall outside the grid are skipped.
///
/// Nothing is recomputed implicitly: callers [`rebuild`](Self::rebuild) after
/// the parent is resized and [`relocate`](Self::relocate) after a child's
/// geometry changes.
#[derive(Clone)]
pub struct RegionIndex<K> {
    policy: RegionPolicy,
    layout: GridLayout,
    buckets: HashMap<Bucket, SmallVec<[K; 8]>>,
    members: HashMap<K, Member>,
}

impl<K: Debug> Debug for RegionIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegionIndex")
            .field("policy", &self.policy)
            .field("layout", &self.layout)
            .field("occupied_buckets", &self.buckets.len())
            .field("members", &self.members.len())
            .finish_non_exhaustive()
    }
}

impl<K> Default for RegionIndex<K> {
    fn default() -> Self {
        Self::with_policy(RegionPolicy::DEFAULT)
    }
}

impl<K> RegionIndex<K> {
    /// Create an empty index for a zero-sized parent using the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index for a zero-sized parent using `policy`.
    pub fn with_policy(policy: RegionPolicy) -> Self {
        Self {
            policy,
            layout: GridLayout::SINGLE,
            buckets: HashMap::new(),
            members: HashMap::new(),
        }
    }

    /// The sizing policy used on rebuild.
    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    /// Current grid dimensions.
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no key is indexed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop every bucket and membership, keeping the layout.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.members.clear();
    }

    /// Iterate occupied buckets and their keys, in unspecified order.
    pub fn occupied_buckets(&self) -> impl Iterator<Item = (Bucket, &[K])> + '_ {
        self.buckets.iter().map(|(&b, keys)| (b, keys.as_slice()))
    }

    /// Keys stored in a bucket, in the order they were placed there.
    ///
    /// Out-of-range and empty buckets yield an empty slice.
    pub fn bucket(&self, col: u32, row: u32) -> &[K] {
        self.buckets
            .get(&(col, row))
            .map(|keys| keys.as_slice())
            .unwrap_or(&[])
    }
}

impl<K: Copy + Eq + Hash> RegionIndex<K> {
    /// Clear the grid, recompute its layout for a `width` x `height` parent,
    /// and place every child again.
    ///
    /// Returns the keys that could not be placed in any bucket.
    pub fn rebuild<I>(&mut self, width: f64, height: f64, children: I) -> Vec<K>
    where
        I: IntoIterator<Item = (K, Aabb2D)>,
    {
        self.clear();
        self.layout = self.policy.layout(width, height);
        let mut unindexed = Vec::new();
        for (key, bounds) in children {
            if !self.insert(key, bounds).is_indexed() {
                unindexed.push(key);
            }
        }
        unindexed
    }

    /// Place `key` in every in-range bucket overlapped by `bounds`.
    ///
    /// If the key is already indexed, its old buckets are released first.
    pub fn insert(&mut self, key: K, bounds: Aabb2D) -> Placement {
        self.remove(&key);

        let Some((cols, rows)) = self.layout.span(&bounds) else {
            return Placement::Unindexed;
        };
        let mut buckets: SmallVec<[Bucket; 4]> = SmallVec::new();
        for col in cols {
            for row in rows.clone() {
                self.buckets.entry((col, row)).or_default().push(key);
                buckets.push((col, row));
            }
        }
        let count = buckets.len();
        self.members.insert(key, Member { bounds, buckets });
        Placement::Indexed(count)
    }

    /// Release `key` from all of its buckets and forget it.
    ///
    /// Returns `false` if the key was not indexed.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(member) = self.members.remove(key) else {
            return false;
        };
        for bucket in &member.buckets {
            let keys = self
                .buckets
                .get_mut(bucket)
                .expect("region invariant violated: member references a missing bucket");
            if let Some(pos) = keys.iter().position(|k| k == key) {
                keys.remove(pos);
            }
            if keys.is_empty() {
                // Occupied buckets only.
                self.buckets.remove(bucket);
            }
        }
        true
    }

    /// Move `key` to the buckets overlapped by its new `bounds`.
    ///
    /// Equivalent to [`remove`](Self::remove) followed by [`insert`](Self::insert).
    pub fn relocate(&mut self, key: K, bounds: Aabb2D) -> Placement {
        self.insert(key, bounds)
    }

    /// Whether `key` is currently indexed.
    pub fn contains(&self, key: &K) -> bool {
        self.members.contains_key(key)
    }

    /// Bounds recorded for `key` when it was last placed.
    pub fn bounds_of(&self, key: &K) -> Option<Aabb2D> {
        self.members.get(key).map(|m| m.bounds)
    }

    /// Buckets currently holding `key`, in column-major order.
    pub fn buckets_of(&self, key: &K) -> Option<&[Bucket]> {
        self.members.get(key).map(|m| m.buckets.as_slice())
    }

    /// Keys whose bounds contain the point.
    ///
    /// Only the single bucket under the point is consulted; membership there is
    /// a superset, so each candidate is checked against its recorded bounds.
    /// Results follow bucket order.
    pub fn query_point(&self, x: f64, y: f64) -> impl Iterator<Item = K> + '_ {
        let keys: &[K] = match self.layout.bucket_at(x, y) {
            Some((col, row)) => self.bucket(col, row),
            None => &[],
        };
        keys.iter().copied().filter(move |key| {
            self.members
                .get(key)
                .is_some_and(|m| m.bounds.contains_point(x, y))
        })
    }

    /// Keys stored in any bucket of the range spanned by two corners.
    ///
    /// Each key is reported once, in first-seen order (columns outer, rows
    /// inner). No exact overlap test is applied: callers needing precise
    /// geometry filter the result themselves.
    pub fn query_region(&self, start: (f64, f64), end: (f64, f64)) -> Vec<K> {
        let mut out = Vec::new();
        let Some((cols, rows)) = self.layout.span(&Aabb2D::from_corners(start, end)) else {
            return out;
        };
        let mut seen: HashSet<K> = HashSet::new();
        for col in cols {
            for row in rows.clone() {
                for &key in self.bucket(col, row) {
                    if seen.insert(key) {
                        out.push(key);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sorted_snapshot(index: &RegionIndex<u32>) -> Vec<(Bucket, Vec<u32>)> {
        let mut out: Vec<_> = index
            .occupied_buckets()
            .map(|(b, keys)| (b, keys.to_vec()))
            .collect();
        out.sort_by_key(|(b, _)| *b);
        out
    }

    fn index_200() -> RegionIndex<u32> {
        let mut index = RegionIndex::new();
        index.rebuild(200.0, 200.0, []);
        index
    }

    #[test]
    fn small_child_occupies_one_bucket_then_moves() {
        let mut index = index_200();
        assert_eq!((index.layout().cols(), index.layout().rows()), (4, 4));

        let placed = index.insert(1, Aabb2D::from_xywh(10.0, 10.0, 20.0, 20.0));
        assert_eq!(placed, Placement::Indexed(1));
        assert_eq!(index.buckets_of(&1), Some(&[(0, 0)][..]));

        // The far corner lands at 210, beyond the grid, and is clipped away.
        index.relocate(1, Aabb2D::from_xywh(190.0, 190.0, 20.0, 20.0));
        assert_eq!(index.buckets_of(&1), Some(&[(3, 3)][..]));
        assert!(index.bucket(0, 0).is_empty());
        assert_eq!(index.bucket(3, 3), &[1]);
    }

    #[test]
    fn spanning_child_is_recorded_in_every_bucket() {
        let mut index = index_200();
        let placed = index.insert(7, Aabb2D::from_xywh(40.0, 40.0, 70.0, 20.0));
        // Columns 0..=2, rows 0..=1.
        assert_eq!(placed, Placement::Indexed(6));
        assert_eq!(
            index.buckets_of(&7),
            Some(&[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)][..])
        );
        for (b, keys) in index.occupied_buckets() {
            assert_eq!(keys, &[7], "bucket {b:?} should only hold key 7");
        }
    }

    #[test]
    fn fully_outside_child_is_unindexed() {
        let mut index = index_200();
        let placed = index.insert(3, Aabb2D::from_xywh(250.0, 10.0, 20.0, 20.0));
        assert_eq!(placed, Placement::Unindexed);
        assert!(!index.contains(&3));
        assert!(index.is_empty());
        assert_eq!(index.query_point(260.0, 20.0).count(), 0);
    }

    #[test]
    fn partially_outside_child_keeps_in_range_buckets() {
        let mut index = index_200();
        let placed = index.insert(3, Aabb2D::from_xywh(-30.0, 20.0, 60.0, 10.0));
        assert_eq!(placed, Placement::Indexed(1));
        assert_eq!(index.buckets_of(&3), Some(&[(0, 0)][..]));
    }

    #[test]
    fn remove_clears_buckets_and_reverse_map() {
        let mut index = index_200();
        index.insert(1, Aabb2D::from_xywh(0.0, 0.0, 120.0, 120.0));
        index.insert(2, Aabb2D::from_xywh(10.0, 10.0, 5.0, 5.0));
        assert!(index.remove(&1));
        assert!(!index.remove(&1));
        assert_eq!(index.buckets_of(&1), None);
        assert_eq!(sorted_snapshot(&index), vec![((0, 0), vec![2])]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let children = [
            (1, Aabb2D::from_xywh(10.0, 10.0, 20.0, 20.0)),
            (2, Aabb2D::from_xywh(40.0, 60.0, 100.0, 30.0)),
            (3, Aabb2D::from_xywh(150.0, 150.0, 49.0, 49.0)),
        ];
        let mut index = RegionIndex::new();
        index.rebuild(200.0, 200.0, children);
        let first = sorted_snapshot(&index);
        index.rebuild(200.0, 200.0, children);
        assert_eq!(sorted_snapshot(&index), first);
    }

    #[test]
    fn rebuild_reports_unindexed_children() {
        let mut index = RegionIndex::new();
        let missing = index.rebuild(
            100.0,
            100.0,
            [
                (1, Aabb2D::from_xywh(10.0, 10.0, 5.0, 5.0)),
                (2, Aabb2D::from_xywh(500.0, 500.0, 5.0, 5.0)),
            ],
        );
        assert_eq!(missing, vec![2]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn zero_sized_parent_indexes_everything_in_one_bucket() {
        let mut index = RegionIndex::new();
        index.rebuild(0.0, 0.0, [(1, Aabb2D::from_xywh(500.0, -20.0, 5.0, 5.0))]);
        assert_eq!(index.buckets_of(&1), Some(&[(0, 0)][..]));
        assert_eq!(index.query_point(502.0, -18.0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn point_query_filters_bucket_candidates() {
        let mut index = index_200();
        index.insert(1, Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0));
        index.insert(2, Aabb2D::from_xywh(20.0, 20.0, 10.0, 10.0));
        // Both share bucket (0, 0) but only key 2 covers the point.
        assert_eq!(index.query_point(25.0, 25.0).collect::<Vec<_>>(), vec![2]);
        // Edges count as inside.
        assert_eq!(index.query_point(10.0, 10.0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(index.query_point(-5.0, 5.0).count(), 0);
    }

    #[test]
    fn region_query_deduplicates_without_exact_filter() {
        let mut index = index_200();
        index.insert(1, Aabb2D::from_xywh(0.0, 0.0, 180.0, 180.0));
        index.insert(2, Aabb2D::from_xywh(5.0, 5.0, 5.0, 5.0));
        // The query rectangle touches bucket (0, 0) without reaching key 2's box,
        // yet key 2 is reported: region queries return bucket members as-is.
        let hits = index.query_region((30.0, 30.0), (120.0, 120.0));
        assert_eq!(hits, vec![1, 2]);
    }

    #[test]
    fn reinserting_replaces_previous_membership() {
        let mut index = index_200();
        index.insert(1, Aabb2D::from_xywh(0.0, 0.0, 10.0, 10.0));
        index.insert(1, Aabb2D::from_xywh(60.0, 0.0, 10.0, 10.0));
        assert_eq!(sorted_snapshot(&index), vec![((1, 0), vec![1])]);
    }

    #[test]
    fn bounds_are_remembered() {
        let mut index = index_200();
        let b = Aabb2D::from_xywh(3.0, 4.0, 5.0, 6.0);
        index.insert(9, b);
        assert_eq!(index.bounds_of(&9), Some(b));
    }
}
