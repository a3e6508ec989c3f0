//! Платформа и тест контакта с землёй
//!
//! Платформа — статическое полигональное тело + визуальный контур. Вершины
//! хранятся относительно центра; bounding box считается один раз при
//! построении формы и используется «легаси»-прямоугольным тестом контакта.
//!
//! # Тест контакта (наблюдаемый контракт)
//!
//! Актор стоит на платформе, когда выполнены ВСЕ три условия:
//! 1. низ актора в полосе `[top, top + 10]` — допуск гасит джиттер интеграции;
//! 2. X актора строго внутри bounding box платформы (даже для невыпуклых
//!    полигонов — приближение намеренное, точный point-in-polygon не нужен
//!    для этого геймплея);
//! 3. |вертикальная скорость| < 0.5 (строго) — отсекает ложный «на земле»
//!    во время быстрого взлёта/падения.
//!
//! Константы допусков — часть контракта, менять нельзя без пересмотра тестов.

use bevy::prelude::*;

use crate::assets::{AssetCatalog, TextureHandle};
use crate::physics::PhysicsBody;

/// Вертикальный допуск полосы контакта, px
pub const GROUND_TOLERANCE: f32 = 10.0;

/// Полоса «почти нулевой» вертикальной скорости, px/tick (строгая с обеих сторон)
pub const GROUND_VELOCITY_EPSILON: f32 = 0.5;

/// Отступ платформы от нижнего края экрана в дефолтном уровне, px
pub const PLATFORM_BOTTOM_MARGIN: f32 = 100.0;

/// Высота дефолтной прямоугольной платформы, px
pub const DEFAULT_PLATFORM_HEIGHT: f32 = 30.0;

/// Логический размер экрана (px). Host обновляет через `ViewportResized`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Событие от host-а: окно изменило размер
#[derive(Event, Debug, Clone, Copy)]
pub struct ViewportResized {
    pub width: f32,
    pub height: f32,
}

/// Форма платформы: вершины относительно центра + bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformShape {
    vertices: Vec<Vec2>,
    half_extents: Vec2,
}

impl PlatformShape {
    /// Полигон из вершин (относительно центра). Меньше 3 вершин — не форма.
    pub fn from_vertices(vertices: Vec<Vec2>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        let mut min = vertices[0];
        let mut max = vertices[0];
        for v in &vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        Some(Self {
            vertices,
            half_extents: (max - min) / 2.0,
        })
    }

    /// Прямоугольник width × height с центром в origin
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            vertices: vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
            half_extents: Vec2::new(hw, hh),
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Y верхней грани bounding box при центре тела в `center`
    pub fn top(&self, center: Vec2) -> f32 {
        center.y - self.half_extents.y
    }
}

/// Платформа уровня. Позиция тела — `Transform` той же entity.
///
/// Жизненный цикл: создаётся при setup уровня, репозиционируется на resize,
/// в течение сессии не уничтожается.
#[derive(Component, Debug, Clone)]
pub struct Platform {
    pub shape: PlatformShape,
}

/// Визуальный контур платформы для рендер-моста
#[derive(Component, Debug, Clone)]
pub struct PlatformVisual {
    pub position: Vec2,
    pub texture: TextureHandle,
}

/// Трёхчастный тест «актор стоит на платформе» (см. док модуля)
pub fn resting_contact(
    platform_center: Vec2,
    shape: &PlatformShape,
    actor_pos: Vec2,
    actor_half_height: f32,
    vertical_velocity: f32,
) -> bool {
    let actor_bottom = actor_pos.y + actor_half_height;
    let platform_top = shape.top(platform_center);

    let vertical_overlap =
        actor_bottom >= platform_top && actor_bottom <= platform_top + GROUND_TOLERANCE;

    let platform_left = platform_center.x - shape.half_extents().x;
    let platform_right = platform_center.x + shape.half_extents().x;
    let horizontal_overlap = actor_pos.x > platform_left && actor_pos.x < platform_right;

    let settled = vertical_velocity > -GROUND_VELOCITY_EPSILON
        && vertical_velocity < GROUND_VELOCITY_EPSILON;

    vertical_overlap && horizontal_overlap && settled
}

/// Заспавнить платформу с данной формой и центром
pub fn spawn_platform(
    commands: &mut Commands,
    catalog: &AssetCatalog,
    center: Vec2,
    shape: PlatformShape,
) -> Entity {
    commands
        .spawn((
            Transform::from_xyz(center.x, center.y, 0.0),
            PhysicsBody::fixed(),
            PlatformVisual {
                position: center,
                texture: catalog.texture("platform"),
            },
            Platform { shape },
        ))
        .id()
}

/// Система: resize окна — обновить Viewport и перецентрировать платформы
///
/// Относительные вершины формы не меняются, двигается только центр тела
/// (единственный легальный способ подвинуть статическое тело).
pub fn apply_viewport_resizes(
    mut resizes: EventReader<ViewportResized>,
    mut viewport: ResMut<Viewport>,
    mut platforms: Query<(&mut Transform, &mut PlatformVisual), With<Platform>>,
) {
    for resize in resizes.read() {
        viewport.width = resize.width;
        viewport.height = resize.height;

        let center = Vec2::new(
            resize.width / 2.0,
            resize.height - PLATFORM_BOTTOM_MARGIN,
        );
        for (mut transform, mut visual) in platforms.iter_mut() {
            transform.translation.x = center.x;
            transform.translation.y = center.y;
            visual.position = center;
        }
    }
}
