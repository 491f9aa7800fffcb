// Copyright 2025 the Zen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small scene, hit-test it, move things around and render it.
//!
//! This example shows how to combine:
//! - `zen_scene` for the entity tree, attributes and change events,
//! - `zen_region` (through the scene) for per-entity child lookup,
//! - `zen_render` for cameras, a HUD and a recorded draw pass.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p zen_demos --example scene_walkthrough`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use zen_render::{Camera, DrawCommand, RecordingSurface, RenderOptions, RenderingEngine};
use zen_scene::{AssetId, EntityEvent, MemoryAsset, Scene, SceneError};

fn main() -> Result<(), SceneError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut scene = Scene::new();
    let world = scene.create(Rect::new(0.0, 0.0, 800.0, 600.0));
    let house = scene.create(Rect::from_origin_size((100.0, 100.0), (200.0, 150.0)));
    let door = scene.create(Rect::from_origin_size((80.0, 90.0), (40.0, 60.0)));
    let player = scene.create(Rect::from_origin_size((400.0, 300.0), (32.0, 32.0)));
    scene.add_child(world, house)?;
    scene.add_child(house, door)?;
    scene.add_child(world, player)?;
    scene.set_kind(player, "player");
    scene.set_collisionable(player, true);

    scene.set_color(world, Some(Color::from_rgb8(30, 90, 30)));
    scene.set_color(house, Some(Color::from_rgb8(150, 70, 40)));
    scene.set_color(door, Some(Color::from_rgb8(90, 50, 20)));
    let sprite = MemoryAsset::image(AssetId(1), 16, 16, vec![255; 16 * 16 * 4]);
    scene.set_texture(player, &sprite)?;

    // Hit-testing works in the searched entity's local space.
    let probe = Point::new(200.0, 220.0);
    log::info!(
        "at {probe:?}: top = {:?}, stack = {:?}",
        scene.find_top_child_at(world, probe),
        scene.find_children_at(world, probe)
    );

    // Listeners see every change to the entity they watch.
    let moves = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&moves);
    scene.subscribe(player, move |_scene, event| {
        if let EntityEvent::LocationUpdate { old, new, .. } = event {
            seen.borrow_mut().push((*old, *new));
        }
    });
    scene.set_coordinate(player, Point::new(180.0, 200.0));
    log::info!("player moves: {:?}", moves.borrow());
    log::info!(
        "player now overlaps the house: {}",
        scene
            .find_children_in(world, Point::new(180.0, 200.0), Point::new(212.0, 232.0))
            .contains(&house)
    );

    // Two cameras side by side, plus a HUD bar.
    let hud = scene.create(Rect::from_origin_size((0.0, 0.0), (800.0, 24.0)));
    scene.set_color(hud, Some(Color::BLACK));
    let mut engine = RenderingEngine::new();
    engine.add_camera(Camera::new(
        world,
        Point::ZERO,
        Size::new(800.0, 600.0),
        Point::new(0.0, 24.0),
        Size::new(400.0, 300.0),
    ));
    let close_up = engine.add_camera(Camera::new(
        world,
        Point::new(150.0, 150.0),
        Size::new(100.0, 100.0),
        Point::new(400.0, 24.0),
        Size::new(400.0, 400.0),
    ));
    engine.set_hud(Some(hud));
    engine.set_options(RenderOptions {
        debug_regions: false,
        debug_cameras: true,
    });

    let assets = vec![sprite];
    let mut surface = RecordingSurface::new();
    for frame in 0..3 {
        let stats = engine.render(&mut scene, &assets, &mut surface);
        let images = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawImage { .. }))
            .count();
        log::info!(
            "frame {frame}: {stats:?}, {} commands, {images} images",
            surface.commands().len()
        );
        surface.clear();
        if let Some(camera) = engine.camera_mut(close_up) {
            camera.pan(Vec2::new(40.0, 0.0));
        }
    }
    Ok(())
}
