//! Физика: гравитация и интеграция тел на fixed timestep
//!
//! Headless режим, без внешнего solver-а: скорость в px/tick, позиция в
//! `Transform` (экранные координаты, +Y вниз). Каждый FixedUpdate тик:
//! gravity → velocity, velocity → translation. Статические тела интеграция
//! не трогает — их двигают только явные repositioning-вызовы (resize уровня).
//!
//! Физического вращения нет: игровое тело имеет бесконечный момент инерции,
//! кувырок при ударе невозможен по построению. Косметическое вращение
//! (флип-анимация) живёт в `ActorVisual`, не здесь.

use bevy::prelude::*;

/// Длительность одного симуляционного тика в миллисекундах (60 Hz)
pub const FIXED_DT_MS: f64 = 1000.0 / 60.0;

/// Гравитация по умолчанию, px/tick² вниз
pub const DEFAULT_GRAVITY: f32 = 0.5;

/// Симуляционные часы: тики и накопленные миллисекунды
///
/// Единственный источник времени для геймплея (возраст снарядов и т.п.).
/// Wall-clock в симуляции не используется — иначе ломается детерминизм.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    pub tick: u64,
    pub elapsed_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += FIXED_DT_MS;
    }
}

/// Параметры физики (гравитация настраивается per-world)
#[derive(Resource, Debug, Clone, Copy)]
pub struct PhysicsConfig {
    /// Ускорение свободного падения, px/tick² (+Y вниз)
    pub gravity_per_tick: Vec2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_per_tick: Vec2::new(0.0, DEFAULT_GRAVITY),
        }
    }
}

/// Тип тела: статическое (платформа) или динамическое (игрок)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Твёрдое тело симуляции
///
/// Позиция — в `Transform` той же entity. Инвариант: интеграция пишет
/// velocity/translation только для `BodyKind::Dynamic`.
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsBody {
    /// px/tick
    pub velocity: Vec2,
    pub kind: BodyKind,
}

impl PhysicsBody {
    /// Динамическое тело (подвержено гравитации и интеграции)
    pub fn dynamic() -> Self {
        Self {
            velocity: Vec2::ZERO,
            kind: BodyKind::Dynamic,
        }
    }

    /// Статическое тело (двигается только явным repositioning)
    pub fn fixed() -> Self {
        Self {
            velocity: Vec2::ZERO,
            kind: BodyKind::Static,
        }
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }
}

/// Система: продвинуть симуляционные часы (первая в тике)
pub fn tick_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

/// Система: гравитация + интеграция скорости в позицию
///
/// Порядок внутри тика: сначала gravity → velocity, затем velocity →
/// translation. Статические тела пропускаются целиком.
pub fn integrate_bodies(
    config: Res<PhysicsConfig>,
    mut bodies: Query<(&mut Transform, &mut PhysicsBody)>,
) {
    for (mut transform, mut body) in bodies.iter_mut() {
        if body.is_static() {
            continue;
        }

        let gravity = config.gravity_per_tick;
        body.velocity += gravity;
        transform.translation.x += body.velocity.x;
        transform.translation.y += body.velocity.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_fixed_dt() {
        let mut clock = SimClock::default();
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.tick, 60);
        assert!((clock.elapsed_ms - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn dynamic_body_accelerates_downward() {
        let config = PhysicsConfig::default();
        let mut body = PhysicsBody::dynamic();
        let mut y = 0.0f32;

        // три тика свободного падения: vy = 0.5, 1.0, 1.5
        for _ in 0..3 {
            body.velocity += config.gravity_per_tick;
            y += body.velocity.y;
        }
        assert!((body.velocity.y - 1.5).abs() < 1e-6);
        assert!((y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn static_body_is_skipped_by_integration() {
        let mut app = App::new();
        app.init_resource::<PhysicsConfig>();
        app.add_systems(Update, integrate_bodies);

        let platform = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 100.0, 0.0), PhysicsBody::fixed()))
            .id();
        let faller = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.0, 0.0), PhysicsBody::dynamic()))
            .id();

        for _ in 0..10 {
            app.update();
        }

        let world = app.world();
        let platform_y = world.get::<Transform>(platform).unwrap().translation.y;
        let faller_y = world.get::<Transform>(faller).unwrap().translation.y;
        assert_eq!(platform_y, 100.0, "статическое тело сдвинулось");
        assert!(faller_y > 0.0, "динамическое тело не падает (+Y вниз)");
    }
}
