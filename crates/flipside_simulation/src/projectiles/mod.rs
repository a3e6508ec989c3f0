//! Снаряды: прямолинейная кинематика и истечение по возрасту
//!
//! Снаряд — отдельная entity вне гравитации: скорость предвычисляется из
//! угла выстрела один раз при спавне и дальше не меняется. Возраст меряется
//! по `SimClock` (симуляционные миллисекунды), не по wall-clock — иначе
//! детерминизм и tick-точные тесты невозможны.
//!
//! Владение эксклюзивное: от спавна до despawn снарядом владеет ECS;
//! удаление идёт через `Commands` (отложенные структурные изменения), так
//! что итерация с удалением не пропускает и не переобрабатывает элементы.
//! Host отцепляет визуал по событию `ProjectileExpired`.

use bevy::prelude::*;

use crate::assets::{AssetCatalog, TextureHandle};
use crate::physics::SimClock;

/// Скорость снаряда, px/tick
pub const PROJECTILE_SPEED: f32 = 50.0;

/// Время жизни снаряда, симуляционные миллисекунды
pub const PROJECTILE_LIFETIME_MS: f64 = 2000.0;

/// Живой снаряд. Позиция — в `Transform` той же entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    /// px/tick, предвычислена при спавне
    pub velocity: Vec2,
    /// `SimClock::elapsed_ms` на момент спавна
    pub spawned_at_ms: f64,
}

impl Projectile {
    /// Истёк ли срок жизни. Граница строгая: ровно на `lifetime` снаряд
    /// ещё жив, уничтожение — строго после.
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_at_ms > PROJECTILE_LIFETIME_MS
    }
}

/// Визуальные параметры снаряда (константны после спавна)
#[derive(Component, Debug, Clone, Copy)]
pub struct ProjectileVisual {
    /// Угол полёта, рад — спрайт ориентируется вдоль траектории
    pub rotation: f32,
    pub texture: TextureHandle,
}

/// Событие: снаряд истёк и удалён — host отцепляет визуал
#[derive(Event, Debug, Clone)]
pub struct ProjectileExpired {
    pub entity: Entity,
}

/// Заспавнить снаряд из точки вылета под углом
pub fn spawn_projectile(
    commands: &mut Commands,
    catalog: &AssetCatalog,
    origin: Vec2,
    angle: f32,
    now_ms: f64,
) -> Entity {
    let velocity = Vec2::new(angle.cos(), angle.sin()) * PROJECTILE_SPEED;
    commands
        .spawn((
            Transform::from_xyz(origin.x, origin.y, 0.0),
            Projectile {
                velocity,
                spawned_at_ms: now_ms,
            },
            ProjectileVisual {
                rotation: angle,
                texture: catalog.texture("bullet"),
            },
        ))
        .id()
}

/// Система: сдвинуть живые снаряды, удалить истёкшие
///
/// Проверка возраста идёт ДО сдвига: истёкший снаряд в этом тике уже
/// не двигается.
pub fn advance_projectiles(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut expired_events: EventWriter<ProjectileExpired>,
    mut projectiles: Query<(Entity, &mut Transform, &Projectile)>,
) {
    for (entity, mut transform, projectile) in projectiles.iter_mut() {
        if projectile.expired(clock.elapsed_ms) {
            commands.entity(entity).despawn();
            expired_events.write(ProjectileExpired { entity });
            continue;
        }
        transform.translation.x += projectile.velocity.x;
        transform.translation.y += projectile.velocity.y;
    }
}
