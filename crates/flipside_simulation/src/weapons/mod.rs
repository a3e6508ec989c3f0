//! Оружие: экипировка, прицеливание, выстрел
//!
//! Поток выстрела — intent → факт (события вместо прямых вызовов):
//! input-routing пишет `WeaponFireIntent`, `fire_weapons` валидирует
//! (экипировано ли оружие) и спавнит снаряд. Выстрел без оружия — no-op
//! по контракту, не ошибка.
//!
//! Экипировка — unequip-first: перед установкой нового предмета текущий
//! снимается (сбрасывается его equipped-флаг в инвентаре). Так инвариант
//! «не больше одного equipped» держится одной точкой входа.
//!
//! Прицел: aim_up уменьшает угол (экранный +Y вниз), кламп ±π/4.

use bevy::prelude::*;

use crate::assets::{AssetCatalog, SoundCue, SoundKind};
use crate::components::ActorVisual;
use crate::inventory::{InventoryStore, ItemId};
use crate::motion::{Facing, MotionState};
use crate::physics::SimClock;
use crate::projectiles::spawn_projectile;
use crate::{log_info, log_warning};

/// Шаг прицеливания за тик удержания, рад
pub const AIM_STEP: f32 = 0.05;

/// Предел отклонения прицела от горизонта, рад
pub const AIM_LIMIT: f32 = std::f32::consts::FRAC_PI_4;

/// Расстояние от центра актора до точки вылета снаряда, px
pub const MUZZLE_OFFSET: f32 = 40.0;

/// Смещение визуала оружия от центра актора, px
pub const WEAPON_OFFSET_X: f32 = 30.0;
pub const WEAPON_OFFSET_Y: f32 = 20.0;

/// Визуальное состояние оружия для рендер-моста
///
/// Горизонтальное зеркалирование делает сам актор (mirror_x), визуал оружия
/// свой масштаб не трогает.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponVisual {
    pub visible: bool,
    pub texture: crate::assets::TextureHandle,
    /// Смещение относительно позиции актора
    pub offset: Vec2,
    /// Радианы; всегда −aim_angle
    pub rotation: f32,
}

/// Оружейная обвязка актора: не больше одного экипированного предмета
///
/// Инвариант: aim_angle форсится в 0 всякий раз, когда equipped становится
/// None (и при каждой новой экипировке).
#[derive(Component, Debug, Clone, Default)]
pub struct WeaponRig {
    pub equipped: Option<ItemId>,
    pub aim_angle: f32,
    pub visual: WeaponVisual,
}

impl WeaponRig {
    pub fn is_equipped(&self) -> bool {
        self.equipped.is_some()
    }

    /// Экипировать предмет из инвентаря (unequip-first, идемпотентно)
    pub fn equip(&mut self, store: &mut InventoryStore, id: &ItemId) {
        self.unequip(store);

        let Some(item) = store.item_mut(id) else {
            log_warning(&format!("Equip failed: item '{}' not in inventory", id.0));
            return;
        };
        item.equipped = true;

        self.equipped = Some(id.clone());
        self.aim_angle = 0.0;
        self.visual.visible = true;
        self.visual.texture = item.texture;
        log_info(&format!("✅ Equipped '{}'", item.name));
    }

    /// Снять оружие. Безопасно при пустых руках (no-op).
    pub fn unequip(&mut self, store: &mut InventoryStore) {
        if let Some(id) = self.equipped.take() {
            if let Some(item) = store.item_mut(&id) {
                item.equipped = false;
            }
        }
        self.aim_angle = 0.0;
        self.visual.visible = false;
    }

    /// Прицел вверх (угол вниз по значению: экранный +Y вниз)
    pub fn aim_up(&mut self) {
        if !self.is_equipped() {
            return;
        }
        self.aim_angle = (self.aim_angle - AIM_STEP).max(-AIM_LIMIT);
    }

    /// Прицел вниз
    pub fn aim_down(&mut self) {
        if !self.is_equipped() {
            return;
        }
        self.aim_angle = (self.aim_angle + AIM_STEP).min(AIM_LIMIT);
    }

    /// Итоговый угол выстрела: база 0/π по взгляду, знак прицела зеркалится
    /// при взгляде влево — «вверх» визуально остаётся вверх
    pub fn fire_angle(&self, facing: Facing) -> f32 {
        let base = match facing {
            Facing::Right => 0.0,
            Facing::Left => std::f32::consts::PI,
        };
        let aim = match facing {
            Facing::Right => self.aim_angle,
            Facing::Left => -self.aim_angle,
        };
        base + aim
    }

    /// Точка вылета снаряда на луче прицела
    pub fn muzzle_point(&self, origin: Vec2, facing: Facing) -> Vec2 {
        let angle = self.fire_angle(facing);
        origin + Vec2::new(angle.cos(), angle.sin()) * MUZZLE_OFFSET
    }
}

/// Intent: актор хочет выстрелить (пишет input-routing)
#[derive(Event, Debug, Clone)]
pub struct WeaponFireIntent {
    pub entity: Entity,
}

/// Intent: снять оружие (правый клик)
#[derive(Event, Debug, Clone)]
pub struct UnequipIntent {
    pub entity: Entity,
}

/// Система: валидация выстрела и спавн снаряда
///
/// 1. Гейт: есть экипированное оружие (иначе no-op)
/// 2. Угол и точка вылета из facing + aim
/// 3. Спавн снаряда, SoundCue::Shoot
pub fn fire_weapons(
    mut intents: EventReader<WeaponFireIntent>,
    mut commands: Commands,
    clock: Res<SimClock>,
    catalog: Res<AssetCatalog>,
    mut sounds: EventWriter<SoundCue>,
    actors: Query<(&ActorVisual, &MotionState, &WeaponRig)>,
) {
    for intent in intents.read() {
        let Ok((visual, motion, rig)) = actors.get(intent.entity) else {
            log_warning(&format!(
                "WeaponFireIntent: entity {:?} has no weapon components",
                intent.entity
            ));
            continue;
        };
        if !rig.is_equipped() {
            continue; // выстрел без оружия — no-op
        }

        let angle = rig.fire_angle(motion.facing);
        let origin = rig.muzzle_point(visual.position, motion.facing);
        spawn_projectile(&mut commands, &catalog, origin, angle, clock.elapsed_ms);
        sounds.write(SoundCue::new(SoundKind::Shoot));
    }
}

/// Система: снятие оружия по intent-у
pub fn process_unequip_requests(
    mut intents: EventReader<UnequipIntent>,
    mut actors: Query<(&mut WeaponRig, &mut InventoryStore)>,
) {
    for intent in intents.read() {
        let Ok((mut rig, mut store)) = actors.get_mut(intent.entity) else {
            log_warning(&format!(
                "UnequipIntent: entity {:?} has no weapon components",
                intent.entity
            ));
            continue;
        };
        rig.unequip(&mut store);
    }
}

/// Система: визуал оружия — смещение по взгляду, поворот −aim
pub fn sync_weapon_visuals(mut rigs: Query<(&mut WeaponRig, &MotionState)>) {
    for (mut rig, motion) in rigs.iter_mut() {
        if !rig.visual.visible {
            continue;
        }
        let dx = match motion.facing {
            Facing::Right => WEAPON_OFFSET_X,
            Facing::Left => -WEAPON_OFFSET_X,
        };
        let rotation = -rig.aim_angle;
        rig.visual.offset = Vec2::new(dx, WEAPON_OFFSET_Y);
        rig.visual.rotation = rotation;
    }
}
