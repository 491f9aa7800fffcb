// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use peniko::Color;
use zen_render::{Camera, RecordingSurface, RenderingEngine};
use zen_scene::{EntityId, MemoryAsset, Scene};

/// A world of `n` x `n` tiles, each holding one smaller decoration.
fn build_world(n: usize, tile: f64) -> (Scene, EntityId) {
    let mut scene = Scene::new();
    let side = n as f64 * tile;
    let world = scene.create(Rect::new(0.0, 0.0, side, side));
    for y in 0..n {
        for x in 0..n {
            let origin = (x as f64 * tile, y as f64 * tile);
            let t = scene.create(Rect::from_origin_size(origin, (tile, tile)));
            scene.set_color(t, Some(Color::from_rgb8(40, 120, 40)));
            let d = scene.create(Rect::new(2.0, 2.0, tile / 2.0, tile / 2.0));
            scene.set_color(d, Some(Color::WHITE));
            scene.add_child(t, d).unwrap();
            scene.add_child(world, t).unwrap();
        }
    }
    (scene, world)
}

fn bench_hit_testing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let (scene, world) = build_world(64, 16.0);
    let points: Vec<Point> = (0..256)
        .map(|i| Point::new((i * 37 % 1024) as f64, (i * 91 % 1024) as f64))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("find_top_child_at", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(scene.find_top_child_at(world, p));
            }
        });
    });
    group.bench_function("find_children_at", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(scene.find_children_at(world, p));
            }
        });
    });
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let (mut scene, world) = build_world(64, 16.0);
    let assets: Vec<MemoryAsset> = Vec::new();
    let mut surface = RecordingSurface::new();
    for &fov in &[128.0, 512.0, 1024.0] {
        let mut engine = RenderingEngine::new();
        engine.add_camera(Camera::new(
            world,
            Point::ZERO,
            Size::new(fov, fov),
            Point::ZERO,
            Size::new(800.0, 800.0),
        ));
        group.bench_function(format!("fov_{fov}"), |b| {
            b.iter(|| {
                surface.clear();
                black_box(engine.render(&mut scene, &assets, &mut surface));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit_testing, bench_frame);
criterion_main!(benches);
