//! Тесты state machine движения (методы, без ECS-прогона —
//! системный уровень покрыт интеграционными тестами)

use super::*;
use crate::components::ActorVisual;
use crate::physics::PhysicsBody;

fn actor() -> (MotionState, PhysicsBody, ActorVisual, PlayerTuning) {
    (
        MotionState::default(),
        PhysicsBody::dynamic(),
        ActorVisual::default(),
        PlayerTuning::default(),
    )
}

fn flip_angle(motion: &MotionState) -> Option<f32> {
    match motion.phase {
        MotionPhase::Airborne {
            jump: JumpKind::Backward { flip: Some(anim) },
        } => Some(anim.angle),
        _ => None,
    }
}

#[test]
fn default_spawns_airborne_facing_right() {
    let motion = MotionState::default();
    assert!(!motion.is_grounded());
    assert!(!motion.is_jumping());
    assert_eq!(motion.facing, Facing::Right);
}

#[test]
fn facing_follows_last_directional_move() {
    let (mut motion, mut body, mut visual, tuning) = actor();

    motion.move_left(&mut body, &mut visual, tuning.speed);
    assert_eq!(motion.facing, Facing::Left);
    motion.move_right(&mut body, &mut visual, tuning.speed);
    assert_eq!(motion.facing, Facing::Right);
    motion.stop_horizontal(&mut body);
    // стоп не трогает взгляд
    assert_eq!(motion.facing, Facing::Right);
    motion.move_left(&mut body, &mut visual, tuning.speed);
    assert_eq!(motion.facing, Facing::Left);
    assert_eq!(motion.facing.sign(), -1.0);
}

#[test]
fn moves_preserve_vertical_velocity() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    body.velocity = Vec2::new(0.0, 4.2);

    motion.move_left(&mut body, &mut visual, tuning.speed);
    assert_eq!(body.velocity, Vec2::new(-1.5, 4.2));
    motion.move_right(&mut body, &mut visual, tuning.speed);
    assert_eq!(body.velocity, Vec2::new(1.5, 4.2));
}

#[test]
fn mirror_follows_facing() {
    let (mut motion, mut body, mut visual, tuning) = actor();

    // арт нарисован влево: Right зеркалит, Left возвращает как есть
    motion.move_right(&mut body, &mut visual, tuning.speed);
    assert_eq!(visual.mirror_x, -1.0);
    motion.move_left(&mut body, &mut visual, tuning.speed);
    assert_eq!(visual.mirror_x, 1.0);
}

#[test]
fn stop_horizontal_only_on_ground() {
    let (mut motion, mut body, _visual, _tuning) = actor();
    body.velocity = Vec2::new(3.0, -2.0);

    // в воздухе — no-op
    motion.stop_horizontal(&mut body);
    assert_eq!(body.velocity.x, 3.0);

    motion.phase = MotionPhase::Grounded;
    motion.stop_horizontal(&mut body);
    assert_eq!(body.velocity.x, 0.0);
    assert_eq!(body.velocity.y, -2.0, "вертикальная составляющая сохраняется");
}

#[test]
fn jump_forward_uses_facing() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    motion.phase = MotionPhase::Grounded;

    motion.jump_forward(&mut body, &tuning);
    assert_eq!(body.velocity, Vec2::new(3.0, -6.0));
    assert!(motion.is_jumping());
    assert!(!motion.is_flipping());

    motion.phase = MotionPhase::Grounded;
    motion.move_left(&mut body, &mut visual, tuning.speed);
    motion.jump_forward(&mut body, &tuning);
    assert_eq!(body.velocity, Vec2::new(-3.0, -6.0));
}

#[test]
fn jump_backward_pushes_against_facing() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    motion.phase = MotionPhase::Grounded;

    // взгляд вправо → импульс влево, сальто крутится в минус
    motion.jump_backward(&mut body, &tuning);
    assert_eq!(body.velocity, Vec2::new(-2.0, -8.0));
    assert!(motion.is_flipping());
    match motion.phase {
        MotionPhase::Airborne {
            jump: JumpKind::Backward { flip: Some(anim) },
        } => {
            assert_eq!(anim.angle, 0.0);
            assert_eq!(anim.direction, -1.0);
        }
        other => panic!("ожидался задний прыжок с флипом, получено {:?}", other),
    }

    motion.phase = MotionPhase::Grounded;
    motion.move_left(&mut body, &mut visual, tuning.speed);
    motion.jump_backward(&mut body, &tuning);
    assert_eq!(body.velocity, Vec2::new(2.0, -8.0));
    match motion.phase {
        MotionPhase::Airborne {
            jump: JumpKind::Backward { flip: Some(anim) },
        } => assert_eq!(anim.direction, 1.0),
        other => panic!("ожидался задний прыжок с флипом, получено {:?}", other),
    }
}

#[test]
fn flip_completes_on_21st_step() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    motion.jump_backward(&mut body, &tuning);

    for _ in 0..20 {
        motion.advance_flip(&mut visual);
    }
    assert!(motion.is_flipping(), "после 20 шагов сальто ещё идёт");
    let angle = flip_angle(&motion).unwrap();
    assert!((angle - 6.0).abs() < 1e-3);
    assert!((visual.rotation - angle * -1.0).abs() < 1e-3);

    // 21-й шаг: угол ≥ 2π, поворот сброшен, сальто завершено без приземления
    motion.advance_flip(&mut visual);
    assert!(!motion.is_flipping());
    assert!(motion.is_jumping(), "прыжок продолжается до приземления");
    assert_eq!(visual.rotation, 0.0);

    // дальнейшие шаги — no-op
    motion.advance_flip(&mut visual);
    assert_eq!(visual.rotation, 0.0);
}

#[test]
fn landing_cancels_incomplete_flip() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    motion.jump_backward(&mut body, &tuning);

    for _ in 0..5 {
        motion.advance_flip(&mut visual);
    }
    assert!(visual.rotation != 0.0);

    motion.land(&mut visual);
    assert!(motion.is_grounded());
    assert!(!motion.is_jumping());
    assert!(!motion.is_flipping());
    assert_eq!(visual.rotation, 0.0);

    // после приземления шаг флипа ничего не делает
    motion.advance_flip(&mut visual);
    assert_eq!(visual.rotation, 0.0);
}

#[test]
fn air_control_is_allowed() {
    let (mut motion, mut body, mut visual, tuning) = actor();
    motion.phase = MotionPhase::Airborne {
        jump: JumpKind::None,
    };
    body.velocity = Vec2::new(0.0, 3.0);

    motion.move_right(&mut body, &mut visual, tuning.speed);
    assert_eq!(body.velocity, Vec2::new(1.5, 3.0));
}

#[test]
fn jump_methods_are_permissive_in_air() {
    // контракт: методы прыжка не проверяют землю, гейт — на routing-слое
    let (mut motion, mut body, _visual, tuning) = actor();
    motion.jump_forward(&mut body, &tuning);
    let first = body.velocity;
    body.velocity.y = 2.0;

    motion.jump_forward(&mut body, &tuning);
    assert_eq!(body.velocity, first, "повторный вызов переустанавливает импульс");
}
