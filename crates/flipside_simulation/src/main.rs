//! Headless симуляция FLIPSIDE
//!
//! Запускает Bevy App без рендера: скриптованный прогон стартового уровня
//! (падение на платформу, пробежка, прыжок, экипировка винтовки, выстрел).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use flipside_simulation::{
    assets::{SoundHandle, SOUND_KEYS, TEXTURE_KEYS},
    create_headless_app, spawn_default_level, AssetCatalog, InputSnapshot, MotionState,
    PlayerInput, Projectile, SimClock, SlotClicked, TextureHandle, Viewport, WeaponRig,
};

fn main() {
    println!("Starting FLIPSIDE headless simulation");

    let mut app = create_headless_app();
    // Один app.update() == ровно один simulation tick
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));

    // Host-регистрация ассетов (handles здесь фиктивные)
    {
        let mut catalog = app.world_mut().resource_mut::<AssetCatalog>();
        for (index, key) in TEXTURE_KEYS.iter().enumerate() {
            catalog.register_texture(key, TextureHandle(index as u32 + 1));
        }
        for (index, key) in SOUND_KEYS.iter().enumerate() {
            catalog.register_sound(key, SoundHandle(index as u32 + 1));
        }
    }

    // Стартовая сцена
    let player = {
        let world = app.world_mut();
        let catalog = world.resource::<AssetCatalog>().clone();
        let viewport = *world.resource::<Viewport>();
        let player;
        {
            let mut commands = world.commands();
            player = spawn_default_level(&mut commands, &catalog, &viewport);
        }
        world.flush();
        player
    };

    // Скрипт: падение → пробежка вправо → прыжок → инвентарь → прицел → выстрел
    for tick in 0..360u64 {
        let mut snapshot = InputSnapshot::default();
        match tick {
            40..=100 => snapshot.move_right = true,
            110..=113 => snapshot.jump_forward = true,
            170 => snapshot.toggle_inventory = true,
            200..=214 => snapshot.aim_up = true,
            220 => snapshot.shoot = true,
            _ => {}
        }
        app.world_mut().resource_mut::<PlayerInput>().submit(snapshot);

        // Host кликает по первому слоту открытого инвентаря
        if tick == 175 {
            app.world_mut().send_event(SlotClicked {
                entity: player,
                slot: 0,
            });
        }

        app.update();

        if tick % 60 == 59 {
            report(&mut app, player);
        }
    }

    println!("Simulation complete!");
}

/// Печать состояния мира (раз в секунду симуляции)
fn report(app: &mut App, player: Entity) {
    let world = app.world_mut();
    let tick = world.resource::<SimClock>().tick;
    let position = world
        .get::<Transform>(player)
        .map(|t| t.translation.truncate())
        .unwrap_or(Vec2::ZERO);
    let grounded = world
        .get::<MotionState>(player)
        .map(|m| m.is_grounded())
        .unwrap_or(false);
    let equipped = world
        .get::<WeaponRig>(player)
        .map(|rig| rig.is_equipped())
        .unwrap_or(false);
    let mut projectiles = world.query::<&Projectile>();
    let in_flight = projectiles.iter(world).count();

    println!(
        "Tick {}: player ({:.1}, {:.1}), grounded={}, equipped={}, projectiles={}",
        tick, position.x, position.y, grounded, equipped, in_flight
    );
}
