//! Player marker и сборка стартового уровня
//!
//! Отмечает entity которым управляет игрок через input. Input systems
//! используют `With<Player>` filter; всё остальное (платформы, снаряды)
//! этот компонент не несёт.

use bevy::prelude::*;

use crate::assets::AssetCatalog;
use crate::components::{ActorSize, ActorVisual};
use crate::inventory::{InventoryItem, InventoryStore, InventoryView};
use crate::motion::{MotionState, PlayerTuning};
use crate::physics::PhysicsBody;
use crate::platform::{
    spawn_platform, PlatformShape, Viewport, DEFAULT_PLATFORM_HEIGHT, PLATFORM_BOTTOM_MARGIN,
};
use crate::weapons::WeaponRig;

/// Marker component для player-controlled entity
///
/// В single-player режиме ровно один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Spawn helper для создания игрока
///
/// Создаёт entity с полным набором компонентов:
/// - Transform (позиция в экранных координатах)
/// - PhysicsBody::dynamic() + MotionState (движение)
/// - ActorSize + ActorVisual (рендер-модель для host-а)
/// - InventoryStore + InventoryView + WeaponRig (предметы и оружие)
pub fn spawn_player(
    commands: &mut Commands,
    catalog: &AssetCatalog,
    position: Vec2,
    size: ActorSize,
    starting_items: Vec<InventoryItem>,
) -> Entity {
    commands
        .spawn((
            Player,
            Transform::from_xyz(position.x, position.y, 0.0),
            // Движение
            PhysicsBody::dynamic(),
            MotionState::default(),
            PlayerTuning::default(),
            // Визуал
            size,
            ActorVisual::at(position, catalog.texture("player")),
            // Предметы
            InventoryStore::with_items(starting_items),
            InventoryView::default(),
            WeaponRig::default(),
        ))
        .id()
}

/// Стартовая сцена: одна платформа внизу экрана + игрок в центре
///
/// Платформа: центр (w/2, h − 100), прямоугольник 0.8·w × 30.
/// Игрок: (w/2, h/2), спрайт 50×40, в инвентаре снайперская винтовка.
pub fn spawn_default_level(
    commands: &mut Commands,
    catalog: &AssetCatalog,
    viewport: &Viewport,
) -> Entity {
    spawn_platform(
        commands,
        catalog,
        Vec2::new(
            viewport.width / 2.0,
            viewport.height - PLATFORM_BOTTOM_MARGIN,
        ),
        PlatformShape::rectangle(viewport.width * 0.8, DEFAULT_PLATFORM_HEIGHT),
    );

    spawn_player(
        commands,
        catalog,
        Vec2::new(viewport.width / 2.0, viewport.height / 2.0),
        ActorSize::default(),
        vec![InventoryItem::new(
            "sniper_rifle",
            "Снайперская винтовка",
            catalog.texture("sniper_rifle"),
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn default_level_layout() {
        let mut world = World::new();
        let catalog = AssetCatalog::default();
        let viewport = Viewport::default();

        let player;
        {
            let mut commands = world.commands();
            player = spawn_default_level(&mut commands, &catalog, &viewport);
        }
        world.flush();

        // Игрок в центре 800×600
        let transform = world.get::<Transform>(player).unwrap();
        assert_eq!(transform.translation.x, 400.0);
        assert_eq!(transform.translation.y, 300.0);
        assert!(world.get::<Player>(player).is_some());

        // Инвентарь содержит винтовку, ещё не экипированную
        let store = world.get::<InventoryStore>(player).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.equipped_item().is_none());

        // Платформа у нижнего края
        let mut platforms = world.query::<(&Platform, &Transform)>();
        let results: Vec<_> = platforms.iter(&world).collect();
        assert_eq!(results.len(), 1);
        let (platform, platform_transform) = results[0];
        assert_eq!(platform_transform.translation.y, 500.0);
        assert_eq!(platform.shape.half_extents(), Vec2::new(320.0, 15.0));
    }
}
