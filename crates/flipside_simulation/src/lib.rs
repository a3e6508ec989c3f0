//! FLIPSIDE Simulation Core
//!
//! ECS-симуляция 2D сайд-скроллера на Bevy 0.16 (headless)
//!
//! АРХИТЕКТУРА:
//! - ECS = source of truth (движение, инвентарь, оружие, снаряды)
//! - Host (рендер, звук, окно, мышь) живёт снаружи: кормит симуляцию
//!   снапшотами ввода и событиями, читает `*Visual` компоненты и `SoundCue`
//!
//! Координаты экранные: origin в левом верхнем углу, +Y вниз,
//! скорости в px/tick при фиксированных 60 Hz.

use bevy::prelude::*;

// Публичные модули
pub mod assets;
pub mod components;
pub mod editor;
pub mod input;
pub mod inventory;
pub mod motion;
pub mod physics;
pub mod platform;
pub mod player;
pub mod projectiles;
pub mod weapons;

// Re-export базовых типов для удобства
pub use assets::{AssetCatalog, SoundCue, SoundKind, TextureHandle};
pub use components::{ActorSize, ActorVisual};
pub use editor::{parse_vertices, DraftMode, ShapeDraft, ShapeError};
pub use input::{InputSnapshot, PlayerInput};
pub use inventory::{
    InventoryItem, InventoryStore, InventoryToggleIntent, InventoryView, ItemId, SlotClicked,
    SlotHovered,
};
pub use motion::{Facing, JumpKind, MotionPhase, MotionState, PlayerTuning};
pub use physics::{PhysicsBody, PhysicsConfig, SimClock};
pub use platform::{Platform, PlatformShape, Viewport, ViewportResized};
pub use player::{spawn_default_level, spawn_player, Player};
pub use projectiles::{Projectile, ProjectileExpired};
pub use weapons::{UnequipIntent, WeaponFireIntent, WeaponRig};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Все системы висят на FixedUpdate одной chain-цепочкой: порядок внутри
/// тика фиксирован, поэтому одинаковый поток ввода даёт одинаковый мир.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Ресурсы симуляции
            .init_resource::<SimClock>()
            .init_resource::<PhysicsConfig>()
            .init_resource::<Viewport>()
            .init_resource::<PlayerInput>()
            .init_resource::<AssetCatalog>()
            .init_resource::<ShapeDraft>()
            // События: intent от host-а, факты от систем
            .add_event::<InventoryToggleIntent>()
            .add_event::<SlotClicked>()
            .add_event::<SlotHovered>()
            .add_event::<WeaponFireIntent>()
            .add_event::<UnequipIntent>()
            .add_event::<SoundCue>()
            .add_event::<ProjectileExpired>()
            .add_event::<ViewportResized>()
            .add_systems(
                FixedUpdate,
                (
                    // Часы и интеграция
                    physics::tick_clock,
                    physics::integrate_bodies,
                    motion::resolve_platform_support,
                    motion::sync_actor_visuals,
                    motion::detect_ground_contact,
                    // Ввод игрока (читает свежий grounded)
                    input::route_player_input,
                    motion::advance_flip_animations,
                    motion::constrain_to_viewport,
                    // Инвентарь и оружие
                    inventory::process_slot_clicks,
                    weapons::process_unequip_requests,
                    weapons::fire_weapons,
                    // Снаряды двигаются после выстрелов: свежий снаряд
                    // получает первый шаг уже в тике спавна
                    projectiles::advance_projectiles,
                    weapons::sync_weapon_visuals,
                    // Host-обвязка
                    platform::apply_viewport_resizes,
                    inventory::refresh_inventory_views,
                    input::rotate_input_snapshots,
                )
                    .chain(), // Последовательное выполнение
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компоненты типа T в байтовый дамп, отсортированный по Entity ID.
/// Два прогона с одинаковым потоком ввода обязаны давать равные дампы.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

use once_cell::sync::Lazy;
use std::sync::Mutex;

// Потокобезопасный глобальный logger (static, поэтому без Arc)
static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

pub static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    *LOGGER.lock().unwrap() = Some(logger);
}

pub fn set_log_level(level: LogLevel) {
    *LOGGER_LEVEL.lock().unwrap() = level;
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if LOGGER.lock().unwrap().is_none() {
        set_logger(logger);
    }
}

pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_int().cmp(&other.as_int())
    }
}

impl PartialEq for LogLevel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for LogLevel {}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn as_int(&self) -> i32 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warning => 2,
            LogLevel::Error => 3,
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    // Сообщения ниже порога отбрасываем, не трогая LOGGER
    if level < *LOGGER_LEVEL.lock().unwrap() {
        return;
    }
    // Лочим mutex, достаём logger, вызываем log (timestamp добавляем здесь)
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format!("[{}] {}", timestamp, message));
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
