//! Ввод: иммутабельный снапшот за тик + edge-события диффом
//!
//! Host пишет снапшот один раз за тик (`PlayerInput::submit`), геймплей
//! читает его только здесь. Кнопки-действия (выстрел, инвентарь, клики) —
//! edge-triggered: «нажато в этом тике» вычисляется диффом с предыдущим
//! снапшотом, а авто-сброс делает одна система ротации в конце тика.
//! Геймплейные обработчики флаги не мутируют никогда.
//!
//! # Порядок гейтов (за тик)
//!
//! 1. toggle-инвентарь (edge);
//! 2. прицел (level, только с оружием);
//! 3. блок движения — пропускается, пока идёт прыжок:
//!    ходьба (level, air control после схода с края сохраняется),
//!    остановка (обе кнопки отпущены и на земле),
//!    прыжки (level + на земле — гейт земли живёт здесь, не в методах);
//! 4. выстрел (edge + оружие);
//! 5. снятие оружия (secondary click, edge).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::{SoundCue, SoundKind};
use crate::components::ActorVisual;
use crate::inventory::InventoryToggleIntent;
use crate::motion::{MotionState, PlayerTuning};
use crate::physics::PhysicsBody;
use crate::player::Player;
use crate::weapons::{UnequipIntent, WeaponFireIntent, WeaponRig};

/// Состояние органов управления на один тик
///
/// move/aim — level (держим — действует), остальные кнопки интерпретируются
/// как edge на стороне `PlayerInput`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_forward: bool,
    pub jump_backward: bool,
    pub aim_up: bool,
    pub aim_down: bool,
    pub shoot: bool,
    pub toggle_inventory: bool,
    pub primary_click: bool,
    pub secondary_click: bool,
}

/// Текущий и предыдущий снапшоты ввода
///
/// Edge = нажато сейчас и не было нажато в прошлом тике. После ротации
/// (`finish_tick`) удержанная кнопка повторно edge не даёт.
#[derive(Resource, Debug, Default, Clone)]
pub struct PlayerInput {
    pub current: InputSnapshot,
    previous: InputSnapshot,
}

impl PlayerInput {
    /// Host подаёт снапшот этого тика (замещает целиком)
    pub fn submit(&mut self, snapshot: InputSnapshot) {
        self.current = snapshot;
    }

    pub fn just_pressed_shoot(&self) -> bool {
        self.current.shoot && !self.previous.shoot
    }

    pub fn just_pressed_toggle_inventory(&self) -> bool {
        self.current.toggle_inventory && !self.previous.toggle_inventory
    }

    pub fn just_pressed_primary(&self) -> bool {
        self.current.primary_click && !self.previous.primary_click
    }

    pub fn just_pressed_secondary(&self) -> bool {
        self.current.secondary_click && !self.previous.secondary_click
    }

    /// Ротация снапшотов — вызывается последней системой тика
    pub fn finish_tick(&mut self) {
        self.previous = self.current;
    }
}

/// Система: маршрутизация ввода в операции подсистем (см. док модуля)
pub fn route_player_input(
    input: Res<PlayerInput>,
    mut fire_intents: EventWriter<WeaponFireIntent>,
    mut unequip_intents: EventWriter<UnequipIntent>,
    mut toggle_intents: EventWriter<InventoryToggleIntent>,
    mut sounds: EventWriter<SoundCue>,
    mut players: Query<
        (
            Entity,
            &mut MotionState,
            &mut PhysicsBody,
            &mut ActorVisual,
            &mut WeaponRig,
            &PlayerTuning,
        ),
        With<Player>,
    >,
) {
    let snapshot = input.current;
    for (entity, mut motion, mut body, mut visual, mut rig, tuning) in players.iter_mut() {
        if input.just_pressed_toggle_inventory() {
            toggle_intents.write(InventoryToggleIntent { entity });
        }

        if rig.is_equipped() {
            if snapshot.aim_up {
                rig.aim_up();
            }
            if snapshot.aim_down {
                rig.aim_down();
            }
        }

        // пока идёт прыжок, движение не переруливается
        if !motion.is_jumping() {
            if snapshot.move_left {
                motion.move_left(&mut body, &mut visual, tuning.speed);
            }
            if snapshot.move_right {
                motion.move_right(&mut body, &mut visual, tuning.speed);
            }
            if !snapshot.move_left && !snapshot.move_right && motion.is_grounded() {
                motion.stop_horizontal(&mut body);
            }

            // гейт земли для прыжков — здесь, методы пермиссивны
            if snapshot.jump_forward && motion.is_grounded() {
                motion.jump_forward(&mut body, tuning);
                sounds.write(SoundCue::new(SoundKind::Jump));
            }
            if snapshot.jump_backward && motion.is_grounded() {
                motion.jump_backward(&mut body, tuning);
                sounds.write(SoundCue::new(SoundKind::Jump));
            }
        }

        if input.just_pressed_shoot() && rig.is_equipped() {
            fire_intents.write(WeaponFireIntent { entity });
        }

        if input.just_pressed_secondary() {
            unequip_intents.write(UnequipIntent { entity });
        }
    }
}

/// Система: авто-сброс edge-флагов ротацией снапшотов (последняя в тике)
pub fn rotate_input_snapshots(mut input: ResMut<PlayerInput>) {
    input.finish_tick();
}
