//! Базовые компоненты актора: размер и визуальное состояние

use bevy::prelude::*;

use crate::assets::{TextureHandle, PLACEHOLDER_TEXTURE};

/// Габариты спрайта актора в px (итоговые, после масштабирования арта)
///
/// Используются в двух местах наблюдаемого контракта: half_height — в тесте
/// контакта с платформой, half_width — в клампе к границам экрана.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActorSize {
    pub width: f32,
    pub height: f32,
}

impl ActorSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

impl Default for ActorSize {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 40.0,
        }
    }
}

/// Визуальное состояние актора — то, что читает рендер-мост
///
/// Симуляция пишет сюда позицию (sync с телом каждый тик), косметическое
/// вращение (флип-анимация) и горизонтальное зеркало.
///
/// Инвариант зеркала: арт игрока нарисован лицом ВЛЕВО, поэтому
/// facing Left → mirror_x = +1 (как нарисовано), facing Right → mirror_x = -1.
#[derive(Component, Debug, Clone, Copy)]
pub struct ActorVisual {
    pub position: Vec2,
    /// Радианы; косметика, физическое тело не вращается
    pub rotation: f32,
    /// ±1, множитель горизонтального масштаба спрайта
    pub mirror_x: f32,
    pub texture: TextureHandle,
}

impl Default for ActorVisual {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            mirror_x: 1.0,
            texture: PLACEHOLDER_TEXTURE,
        }
    }
}

impl ActorVisual {
    pub fn at(position: Vec2, texture: TextureHandle) -> Self {
        Self {
            position,
            texture,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_dimensions() {
        let size = ActorSize::new(50.0, 40.0);
        assert_eq!(size.half_width(), 25.0);
        assert_eq!(size.half_height(), 20.0);
    }

    #[test]
    fn default_visual_is_unmirrored_and_upright() {
        let visual = ActorVisual::default();
        assert_eq!(visual.mirror_x, 1.0);
        assert_eq!(visual.rotation, 0.0);
        assert_eq!(visual.texture, PLACEHOLDER_TEXTURE);
    }
}
