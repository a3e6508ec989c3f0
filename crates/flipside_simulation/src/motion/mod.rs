//! Управление движением игрока: состояние земля/воздух, прыжки, флип
//!
//! # Архитектура
//!
//! Центральная state machine симуляции. Вместо россыпи булевых флагов
//! (isOnGround / isJumping / isFlipping / jumpType) состояние хранится одним
//! tagged-вариантом `MotionPhase` — нелегальные комбинации («флип без
//! заднего прыжка», «на земле и в прыжке») непредставимы типом.
//!
//! Контракт преднамеренно пермиссивный: методы прыжков НЕ проверяют землю
//! сами (повторный вызов в воздухе просто переустановит скорость), гейт
//! «прыгать можно только с земли» живёт в input-routing слое. Зато
//! `stop_horizontal` проверяет землю внутри — в воздухе баллистический
//! импульс гасить нельзя.
//!
//! Порядок систем внутри тика:
//! 1. `resolve_platform_support` — падающее тело, пересёкшее верх платформы,
//!    ставится на неё (landing snap), вертикальная скорость зануляется;
//! 2. `sync_actor_visuals` — позиция визуала из тела, угол сброшен в 0;
//! 3. `detect_ground_contact` — трёхчастный тест; переход в Grounded гасит
//!    весь прыжковый стейт и угол визуала;
//! 4. (input routing);
//! 5. `advance_flip_animations` — косметический поворот заднего сальто;
//! 6. `constrain_to_viewport` — кламп X прямым repositioning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{ActorSize, ActorVisual};
use crate::physics::PhysicsBody;
use crate::platform::{resting_contact, Platform, Viewport, GROUND_TOLERANCE};

#[cfg(test)]
mod motion_tests;

/// Приращение угла сальто за тик, рад (полный оборот за ⌈2π/0.3⌉ = 21 тик)
pub const FLIP_STEP: f32 = 0.3;

/// Направление взгляда актора. Нуля нет по построению.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Косметическая анимация сальто (только задний прыжок)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipAnim {
    /// Накопленный угол, 0..2π
    pub angle: f32,
    /// ±1: знак вращения визуала
    pub direction: f32,
}

/// Тип прыжка в воздушной фазе
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpKind {
    /// В воздухе без прыжка (сошли с края платформы)
    None,
    Forward,
    Backward {
        /// None — сальто уже докручено в воздухе
        flip: Option<FlipAnim>,
    },
}

/// Фаза движения: земля или воздух с типом прыжка
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionPhase {
    Grounded,
    Airborne { jump: JumpKind },
}

/// Состояние движения актора
///
/// Инварианты (структурные, см. док модуля): флип существует только внутри
/// `Airborne { Backward }`; `Grounded` исключает любой прыжковый стейт.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub phase: MotionPhase,
    pub facing: Facing,
}

impl Default for MotionState {
    fn default() -> Self {
        // спавнимся в воздухе и падаем на платформу
        Self {
            phase: MotionPhase::Airborne { jump: JumpKind::None },
            facing: Facing::Right,
        }
    }
}

impl MotionState {
    pub fn is_grounded(&self) -> bool {
        self.phase == MotionPhase::Grounded
    }

    /// Прыжок в процессе (воздух после сошедшего края — не прыжок)
    pub fn is_jumping(&self) -> bool {
        matches!(
            self.phase,
            MotionPhase::Airborne {
                jump: JumpKind::Forward | JumpKind::Backward { .. }
            }
        )
    }

    pub fn is_flipping(&self) -> bool {
        matches!(
            self.phase,
            MotionPhase::Airborne {
                jump: JumpKind::Backward { flip: Some(_) }
            }
        )
    }

    /// Идти влево: горизонтальная скорость −speed, вертикальная сохраняется.
    /// Легально и в воздухе (air control).
    pub fn move_left(&mut self, body: &mut PhysicsBody, visual: &mut ActorVisual, speed: f32) {
        body.velocity.x = -speed;
        self.facing = Facing::Left;
        // арт нарисован влево — без зеркала
        visual.mirror_x = 1.0;
    }

    /// Идти вправо: горизонтальная скорость +speed, вертикальная сохраняется
    pub fn move_right(&mut self, body: &mut PhysicsBody, visual: &mut ActorVisual, speed: f32) {
        body.velocity.x = speed;
        self.facing = Facing::Right;
        visual.mirror_x = -1.0;
    }

    /// Остановить горизонтальное движение. Только на земле — в воздухе no-op.
    pub fn stop_horizontal(&self, body: &mut PhysicsBody) {
        if !self.is_grounded() {
            return;
        }
        body.velocity.x = 0.0;
    }

    /// Прыжок вперёд по направлению взгляда
    pub fn jump_forward(&mut self, body: &mut PhysicsBody, tuning: &PlayerTuning) {
        body.velocity = Vec2::new(
            self.facing.sign() * tuning.jump_forward_force,
            -tuning.jump_forward_up_force,
        );
        self.phase = MotionPhase::Airborne {
            jump: JumpKind::Forward,
        };
    }

    /// Задний прыжок с сальто: импульс против взгляда, выше переднего
    pub fn jump_backward(&mut self, body: &mut PhysicsBody, tuning: &PlayerTuning) {
        body.velocity = Vec2::new(
            -self.facing.sign() * tuning.jump_backward_force,
            -tuning.jump_backward_up_force,
        );
        self.phase = MotionPhase::Airborne {
            jump: JumpKind::Backward {
                flip: Some(FlipAnim {
                    angle: 0.0,
                    direction: -self.facing.sign(),
                }),
            },
        };
    }

    /// Один шаг флип-анимации (вызывается раз в тик)
    ///
    /// Угол растёт на `FLIP_STEP`, визуал крутится `angle * direction`;
    /// при достижении 2π поворот сбрасывается в 0 и сальто завершается
    /// (актор может остаться в воздухе с jump == Backward { flip: None }).
    pub fn advance_flip(&mut self, visual: &mut ActorVisual) {
        let MotionPhase::Airborne {
            jump: JumpKind::Backward { flip },
        } = &mut self.phase
        else {
            return;
        };
        let Some(anim) = flip.as_mut() else {
            return;
        };

        anim.angle += FLIP_STEP;
        visual.rotation = anim.angle * anim.direction;
        if anim.angle >= std::f32::consts::TAU {
            visual.rotation = 0.0;
            *flip = None;
        }
    }

    /// Приземление: гасит весь прыжковый стейт и форсит угол визуала в 0,
    /// независимо от прогресса сальто (недокрученный флип обрывается)
    pub fn land(&mut self, visual: &mut ActorVisual) {
        self.phase = MotionPhase::Grounded;
        visual.rotation = 0.0;
    }
}

/// Настройки движения актора (сериализуемые, per-actor)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Скорость ходьбы, px/tick
    pub speed: f32,
    /// Горизонтальный импульс переднего прыжка
    pub jump_forward_force: f32,
    /// Вертикальный импульс переднего прыжка
    pub jump_forward_up_force: f32,
    /// Горизонтальный импульс заднего прыжка
    pub jump_backward_force: f32,
    /// Вертикальный импульс заднего прыжка (выше переднего — время на сальто)
    pub jump_backward_up_force: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 1.5,
            jump_forward_force: 3.0,
            jump_forward_up_force: 6.0,
            jump_backward_force: 2.0,
            jump_backward_up_force: 8.0,
        }
    }
}

/// Система: landing snap — падающее тело ставится на платформу
///
/// Заменяет collision response внешнего физдвижка для единственного
/// моделируемого контакта. Ловит и пересечение верха за один тик
/// (быстрое падение), и стабильное стояние (гравитация каждый тик
/// утапливает тело на 0.5px — снап возвращает его на top).
pub fn resolve_platform_support(
    platforms: Query<(&Transform, &Platform), Without<MotionState>>,
    mut actors: Query<(&mut Transform, &mut PhysicsBody, &ActorSize), With<MotionState>>,
) {
    for (mut transform, mut body, size) in actors.iter_mut() {
        // взлетаем — сквозь платформу снизу вверх проходим свободно
        if body.velocity.y < 0.0 {
            continue;
        }

        for (platform_transform, platform) in platforms.iter() {
            let center = platform_transform.translation.truncate();
            let shape = &platform.shape;

            let left = center.x - shape.half_extents().x;
            let right = center.x + shape.half_extents().x;
            if !(transform.translation.x > left && transform.translation.x < right) {
                continue;
            }

            let top = shape.top(center);
            let bottom = transform.translation.y + size.half_height();
            let bottom_before_step = bottom - body.velocity.y;
            if bottom_before_step <= top + GROUND_TOLERANCE && bottom >= top {
                transform.translation.y = top - size.half_height();
                body.velocity.y = 0.0;
            }
        }
    }
}

/// Система: позиция визуала из тела
///
/// Угол сбрасывается в 0 каждый тик (тело с бесконечной инерцией не
/// вращается); активная флип-анимация перезапишет его позже в том же тике.
pub fn sync_actor_visuals(mut actors: Query<(&Transform, &mut ActorVisual), With<MotionState>>) {
    for (transform, mut visual) in actors.iter_mut() {
        visual.position = transform.translation.truncate();
        visual.rotation = 0.0;
    }
}

/// Система: пересчитать контакт с землёй, обработать приземление и сход с края
pub fn detect_ground_contact(
    platforms: Query<(&Transform, &Platform)>,
    mut actors: Query<(
        &Transform,
        &PhysicsBody,
        &ActorSize,
        &mut MotionState,
        &mut ActorVisual,
    )>,
) {
    for (transform, body, size, mut motion, mut visual) in actors.iter_mut() {
        let pos = transform.translation.truncate();
        let contact = platforms.iter().any(|(platform_transform, platform)| {
            resting_contact(
                platform_transform.translation.truncate(),
                &platform.shape,
                pos,
                size.half_height(),
                body.velocity.y,
            )
        });

        if contact {
            if !motion.is_grounded() {
                motion.land(&mut visual);
            }
        } else if motion.is_grounded() {
            // сошли с края без прыжка — воздух, air control остаётся
            motion.phase = MotionPhase::Airborne {
                jump: JumpKind::None,
            };
        }
    }
}

/// Система: шаг флип-анимации для всех акторов
pub fn advance_flip_animations(mut actors: Query<(&mut MotionState, &mut ActorVisual)>) {
    for (mut motion, mut visual) in actors.iter_mut() {
        motion.advance_flip(&mut visual);
    }
}

/// Система: прижатие X к границам экрана прямым repositioning (не скоростью).
/// Проверки независимые; в окне уже актора последнее слово за правой границей.
pub fn constrain_to_viewport(
    viewport: Res<Viewport>,
    mut actors: Query<(&mut Transform, &ActorSize), With<MotionState>>,
) {
    for (mut transform, size) in actors.iter_mut() {
        let half = size.half_width();
        if transform.translation.x < half {
            transform.translation.x = half;
        }
        if transform.translation.x > viewport.width - half {
            transform.translation.x = viewport.width - half;
        }
    }
}
