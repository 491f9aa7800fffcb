// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Absolute geometry and hit-testing over the scene.
//!
//! Child lookups go through the parent's region index, so children lying
//! outside their parent's extent are never found here. All coordinates passed
//! to these queries are in the local space of the entity being searched.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::entity::Entity;
use crate::scene::Scene;
use crate::types::EntityId;
use crate::util::point_pair;

impl Scene {
    /// Position of `id` in root space: its own position plus every ancestor's.
    pub fn absolute_position(&self, id: EntityId) -> Option<Point> {
        let mut entity = self.get(id)?;
        let mut offset = entity.coordinate().to_vec2();
        while let Some(parent) = entity.parent() {
            entity = self.node(parent);
            offset += entity.coordinate().to_vec2();
        }
        Some(offset.to_point())
    }

    /// Absolute left edge.
    pub fn absolute_x(&self, id: EntityId) -> Option<f64> {
        self.absolute_position(id).map(|p| p.x)
    }

    /// Absolute top edge.
    pub fn absolute_y(&self, id: EntityId) -> Option<f64> {
        self.absolute_position(id).map(|p| p.y)
    }

    /// Absolute right edge.
    pub fn absolute_x2(&self, id: EntityId) -> Option<f64> {
        Some(self.absolute_x(id)? + self.get(id)?.width())
    }

    /// Absolute bottom edge.
    pub fn absolute_y2(&self, id: EntityId) -> Option<f64> {
        Some(self.absolute_y(id)? + self.get(id)?.height())
    }

    /// Bounding box of `id` in root space.
    pub fn absolute_bounds(&self, id: EntityId) -> Option<Rect> {
        let origin = self.absolute_position(id)?;
        Some(Rect::from_origin_size(origin, self.get(id)?.size()))
    }

    /// Direct children of `id` whose box contains `point` (edges included),
    /// in paint order.
    pub fn children_at(&self, id: EntityId, point: Point) -> Vec<EntityId> {
        let Some(entity) = self.get(id) else {
            return Vec::new();
        };
        let mut hits: Vec<_> = entity.regions().query_point(point.x, point.y).collect();
        self.sort_by_paint_order(&mut hits);
        hits
    }

    /// Direct children stored in any bucket spanned by `start` and `end`, in
    /// paint order.
    ///
    /// This is a coarse lookup: a child sharing a bucket with the rectangle is
    /// returned even if it does not overlap it.
    /// [`find_children_in`](Self::find_children_in) applies the exact test.
    pub fn children_in(&self, id: EntityId, start: Point, end: Point) -> Vec<EntityId> {
        let Some(entity) = self.get(id) else {
            return Vec::new();
        };
        let mut hits = entity
            .regions()
            .query_region(point_pair(start), point_pair(end));
        self.sort_by_paint_order(&mut hits);
        hits
    }

    /// Every descendant of `id` containing `point`, depth first.
    ///
    /// Each matching child is followed by its own matches, searched with the
    /// point translated into that child's space.
    pub fn find_children_at(&self, id: EntityId, point: Point) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.collect_at(id, point, &mut out);
        out
    }

    fn collect_at(&self, id: EntityId, point: Point, out: &mut Vec<EntityId>) {
        for child in self.children_at(id, point) {
            out.push(child);
            let origin = self.node(child).coordinate().to_vec2();
            self.collect_at(child, point - origin, out);
        }
    }

    /// Every descendant of `id` overlapping the rectangle spanned by `start`
    /// and `end`, depth first.
    ///
    /// Overlap is strict on both axes: boxes that only touch the rectangle's
    /// edge do not match. Both corners are translated into each matching
    /// child's space before descending.
    pub fn find_children_in(&self, id: EntityId, start: Point, end: Point) -> Vec<EntityId> {
        let mut out = Vec::new();
        let area = Rect::from_points(start, end);
        self.collect_in(id, area, &mut out);
        out
    }

    fn collect_in(&self, id: EntityId, area: Rect, out: &mut Vec<EntityId>) {
        for child in self.children_in(id, area.origin(), Point::new(area.x1, area.y1)) {
            let entity = self.node(child);
            let bounds = entity.local_bounds().abs();
            let overlaps = area.x0 < bounds.x1
                && area.x1 > bounds.x0
                && area.y0 < bounds.y1
                && area.y1 > bounds.y0;
            if overlaps {
                out.push(child);
                self.collect_in(child, area - entity.coordinate().to_vec2(), out);
            }
        }
    }

    /// The deepest, topmost descendant of `id` under `point`.
    ///
    /// Among the direct children containing the point, the last in paint order
    /// wins; the search then continues inside it. Returns `None` when no child
    /// contains the point.
    pub fn find_top_child_at(&self, id: EntityId, point: Point) -> Option<EntityId> {
        let top = *self.children_at(id, point).last()?;
        let local = point - self.node(top).coordinate().to_vec2();
        Some(self.find_top_child_at(top, local).unwrap_or(top))
    }

    /// Sort sibling ids by ascending paint key.
    fn sort_by_paint_order(&self, ids: &mut [EntityId]) {
        ids.sort_by_key(|&c| self.get(c).map_or(0, Entity::paint_key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn tree() -> (Scene, EntityId) {
        let mut scene = Scene::new();
        let root = scene.create(Rect::new(0.0, 0.0, 200.0, 200.0));
        (scene, root)
    }

    fn attach(scene: &mut Scene, parent: EntityId, bounds: Rect) -> EntityId {
        let child = scene.create(bounds);
        scene.add_child(parent, child).unwrap();
        child
    }

    #[test]
    fn absolute_geometry_sums_ancestors() {
        let (mut scene, root) = tree();
        scene.set_coordinate(root, Point::new(5.0, 7.0));
        let child = attach(&mut scene, root, Rect::new(10.0, 20.0, 110.0, 120.0));
        let leaf = attach(&mut scene, child, Rect::new(1.0, 2.0, 4.0, 6.0));

        assert_eq!(scene.absolute_position(leaf), Some(Point::new(16.0, 29.0)));
        assert_eq!(scene.absolute_x2(leaf), Some(19.0));
        assert_eq!(scene.absolute_y2(leaf), Some(33.0));
        assert_eq!(
            scene.absolute_bounds(child),
            Some(Rect::new(15.0, 27.0, 115.0, 127.0))
        );

        // Recomputed on demand after a move.
        scene.set_x(root, 0.0);
        assert_eq!(scene.absolute_x(leaf), Some(11.0));
    }

    #[test]
    fn top_child_at_own_coordinate() {
        let (mut scene, root) = tree();
        let a = attach(&mut scene, root, Rect::new(10.0, 10.0, 30.0, 30.0));
        let b = attach(&mut scene, root, Rect::new(120.0, 40.0, 150.0, 90.0));
        for id in [a, b] {
            let at = scene.get(id).unwrap().coordinate();
            assert_eq!(scene.find_top_child_at(root, at), Some(id));
        }
        assert_eq!(scene.find_top_child_at(root, Point::new(100.0, 150.0)), None);
    }

    #[test]
    fn top_child_prefers_last_painted_and_descends() {
        let (mut scene, root) = tree();
        let under = attach(&mut scene, root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let over = attach(&mut scene, root, Rect::new(50.0, 50.0, 150.0, 150.0));
        let inner = attach(&mut scene, over, Rect::new(10.0, 10.0, 20.0, 20.0));

        assert_eq!(scene.find_top_child_at(root, Point::new(75.0, 75.0)), Some(over));
        assert_eq!(scene.find_top_child_at(root, Point::new(65.0, 65.0)), Some(inner));
        assert_eq!(scene.find_top_child_at(root, Point::new(25.0, 25.0)), Some(under));

        scene.set_paint_key(under, u64::MAX);
        assert_eq!(scene.find_top_child_at(root, Point::new(75.0, 75.0)), Some(under));
    }

    #[test]
    fn containment_includes_edges() {
        let (mut scene, root) = tree();
        let a = attach(&mut scene, root, Rect::new(10.0, 10.0, 30.0, 30.0));
        assert_eq!(scene.children_at(root, Point::new(30.0, 30.0)), vec![a]);
        assert!(scene.children_at(root, Point::new(30.5, 30.0)).is_empty());
    }

    #[test]
    fn find_children_at_is_depth_first() {
        let (mut scene, root) = tree();
        let a = attach(&mut scene, root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let a1 = attach(&mut scene, a, Rect::new(0.0, 0.0, 50.0, 50.0));
        let a1x = attach(&mut scene, a1, Rect::new(10.0, 10.0, 20.0, 20.0));
        let b = attach(&mut scene, root, Rect::new(10.0, 10.0, 40.0, 40.0));
        let _miss = attach(&mut scene, a, Rect::new(60.0, 60.0, 90.0, 90.0));

        assert_eq!(
            scene.find_children_at(root, Point::new(15.0, 15.0)),
            vec![a, a1, a1x, b]
        );
    }

    #[test]
    fn find_children_in_filters_and_translates() {
        let (mut scene, root) = tree();
        let a = attach(&mut scene, root, Rect::new(100.0, 100.0, 200.0, 200.0));
        let inside = attach(&mut scene, a, Rect::new(0.0, 0.0, 20.0, 20.0));
        let outside = attach(&mut scene, a, Rect::new(80.0, 80.0, 100.0, 100.0));
        // Shares bucket (0, 0) with the query but does not overlap it.
        let neighbour = attach(&mut scene, root, Rect::new(0.0, 0.0, 5.0, 5.0));

        let found = scene.find_children_in(root, Point::new(10.0, 10.0), Point::new(130.0, 130.0));
        assert_eq!(found, vec![a, inside]);
        assert!(!found.contains(&outside));
        assert!(!found.contains(&neighbour));

        // Reversed corners describe the same rectangle.
        let reversed =
            scene.find_children_in(root, Point::new(130.0, 130.0), Point::new(10.0, 10.0));
        assert_eq!(reversed, found);
    }

    #[test]
    fn find_children_in_is_strict_at_edges() {
        let (mut scene, root) = tree();
        let _a = attach(&mut scene, root, Rect::new(50.0, 50.0, 60.0, 60.0));
        assert!(
            scene
                .find_children_in(root, Point::new(0.0, 0.0), Point::new(50.0, 50.0))
                .is_empty()
        );
    }

    #[test]
    fn children_in_is_bucket_coarse() {
        let (mut scene, root) = tree();
        let near = attach(&mut scene, root, Rect::new(40.0, 40.0, 45.0, 45.0));
        let far = attach(&mut scene, root, Rect::new(160.0, 160.0, 170.0, 170.0));
        // The rectangle (0,0)-(5,5) does not touch `near`, but they share bucket (0, 0).
        let coarse = scene.children_in(root, Point::ZERO, Point::new(5.0, 5.0));
        assert_eq!(coarse, vec![near]);
        assert!(
            scene
                .find_children_in(root, Point::ZERO, Point::new(5.0, 5.0))
                .is_empty()
        );
        let all = scene.children_in(root, Point::ZERO, Point::new(199.0, 199.0));
        assert_eq!(all, vec![near, far]);
    }

    #[test]
    fn unindexed_children_are_invisible_to_queries() {
        let (mut scene, root) = tree();
        let out = attach(&mut scene, root, Rect::new(300.0, 300.0, 320.0, 320.0));
        assert!(scene.get(root).unwrap().is_child(out));
        assert_eq!(scene.children_of(root), &[out]);
        assert_eq!(scene.find_top_child_at(root, Point::new(310.0, 310.0)), None);
        assert!(
            scene
                .find_children_in(root, Point::ZERO, Point::new(400.0, 400.0))
                .is_empty()
        );
    }
}
