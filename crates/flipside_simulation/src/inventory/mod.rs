//! Инвентарь: упорядоченный список предметов + протокол экипировки
//!
//! Store хранит предметы в порядке добавления (это и есть порядок
//! отображения). Инвариант: не больше одного предмета с equipped == true —
//! обеспечивается unequip-first шагом внутри `WeaponRig::equip`, сюда
//! отдельная проверка не дублируется.
//!
//! `InventoryView` — авторитетная модель открытой сетки 12×6 для host-а.
//! Открытие ВСЕГДА пересобирает слоты из текущего списка (устаревшие ссылки
//! на предметы/текстуры после экипировки не должны дожить до показа — это
//! требование корректности, не косметика). Закрытие гасит hover-подпись.

use bevy::prelude::*;

use crate::assets::{SoundCue, SoundKind, TextureHandle};
use crate::log_warning;
use crate::weapons::WeaponRig;

pub const INVENTORY_COLS: usize = 12;
pub const INVENTORY_ROWS: usize = 6;
pub const INVENTORY_CAPACITY: usize = INVENTORY_COLS * INVENTORY_ROWS;

/// Идентификатор предмета (snake_case ASCII)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Предмет инвентаря
#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub id: ItemId,
    /// Отображаемое имя (для hover-подписи)
    pub name: String,
    pub texture: TextureHandle,
    pub equipped: bool,
}

impl InventoryItem {
    pub fn new(id: impl Into<ItemId>, name: &str, texture: TextureHandle) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            texture,
            equipped: false,
        }
    }
}

/// Упорядоченное хранилище предметов актора
#[derive(Component, Debug, Clone, Default)]
pub struct InventoryStore {
    items: Vec<InventoryItem>,
}

impl InventoryStore {
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// Добавить предмет в конец (порядок добавления = порядок показа)
    pub fn add_item(&mut self, item: InventoryItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn item_at(&self, index: usize) -> Option<&InventoryItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn equipped_item(&self) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.equipped)
    }

    /// Счётчик для проверки инварианта «не больше одного equipped»
    pub fn equipped_count(&self) -> usize {
        self.items.iter().filter(|item| item.equipped).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Занятая ячейка сетки инвентаря
#[derive(Debug, Clone)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub name: String,
    pub texture: TextureHandle,
}

/// Модель открытой сетки инвентаря (12×6)
#[derive(Component, Debug, Clone)]
pub struct InventoryView {
    pub open: bool,
    slots: Vec<Option<InventorySlot>>,
    /// Имя предмета под курсором (подпись в UI)
    pub hovered_name: Option<String>,
}

impl Default for InventoryView {
    fn default() -> Self {
        Self {
            open: false,
            slots: vec![None; INVENTORY_CAPACITY],
            hovered_name: None,
        }
    }
}

impl InventoryView {
    pub fn slots(&self) -> &[Option<InventorySlot>] {
        &self.slots
    }

    /// Открыть/закрыть. Открытие пересобирает слоты, закрытие гасит hover.
    pub fn toggle(&mut self, store: &InventoryStore) {
        self.open = !self.open;
        if self.open {
            self.rebuild(store);
        } else {
            self.hovered_name = None;
        }
    }

    /// Полная пересборка слотов из текущего порядка store
    pub fn rebuild(&mut self, store: &InventoryStore) {
        self.slots = (0..INVENTORY_CAPACITY)
            .map(|index| {
                store.item_at(index).map(|item| InventorySlot {
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    texture: item.texture,
                })
            })
            .collect();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.hovered_name = None;
    }

    /// Навести курсор на ячейку. true — ячейка занята (подпись показана).
    pub fn set_hover(&mut self, slot: usize) -> bool {
        match self.slots.get(slot).and_then(|slot| slot.as_ref()) {
            Some(occupied) => {
                self.hovered_name = Some(occupied.name.clone());
                true
            }
            None => {
                self.hovered_name = None;
                false
            }
        }
    }

    pub fn clear_hover(&mut self) {
        self.hovered_name = None;
    }
}

/// Событие от host-UI: клик по ячейке сетки
#[derive(Event, Debug, Clone)]
pub struct SlotClicked {
    pub entity: Entity,
    pub slot: usize,
}

/// Событие от host-UI: курсор над ячейкой (None — курсор ушёл с сетки)
#[derive(Event, Debug, Clone)]
pub struct SlotHovered {
    pub entity: Entity,
    pub slot: Option<usize>,
}

/// Intent: переключить инвентарь (генерируется input-routing-ом)
#[derive(Event, Debug, Clone)]
pub struct InventoryToggleIntent {
    pub entity: Entity,
}

/// Система: клик по занятой ячейке — экипировка и закрытие инвентаря
///
/// 1. Гейт: инвентарь открыт, ячейка занята
/// 2. `WeaponRig::equip` (unequip-first — инвариант одного equipped)
/// 3. Выбор закрывает сетку и гасит hover
pub fn process_slot_clicks(
    mut clicks: EventReader<SlotClicked>,
    mut actors: Query<(&mut WeaponRig, &mut InventoryStore, &mut InventoryView)>,
) {
    for click in clicks.read() {
        let Ok((mut rig, mut store, mut view)) = actors.get_mut(click.entity) else {
            log_warning(&format!(
                "SlotClicked: entity {:?} has no inventory components",
                click.entity
            ));
            continue;
        };
        if !view.open {
            continue;
        }
        let Some(item_id) = store.item_at(click.slot).map(|item| item.id.clone()) else {
            continue; // пустая ячейка
        };

        rig.equip(&mut store, &item_id);
        view.close();
    }
}

/// Система: toggle-интенты и hover от host-UI
pub fn refresh_inventory_views(
    mut toggles: EventReader<InventoryToggleIntent>,
    mut hovers: EventReader<SlotHovered>,
    mut sounds: EventWriter<SoundCue>,
    mut views: Query<(&mut InventoryView, &InventoryStore)>,
) {
    for intent in toggles.read() {
        let Ok((mut view, store)) = views.get_mut(intent.entity) else {
            log_warning(&format!(
                "InventoryToggleIntent: entity {:?} has no inventory",
                intent.entity
            ));
            continue;
        };
        view.toggle(store);
    }

    for hover in hovers.read() {
        let Ok((mut view, _)) = views.get_mut(hover.entity) else {
            continue;
        };
        if !view.open {
            continue;
        }
        match hover.slot {
            Some(slot) => {
                // Звук наведения — для любой ячейки сетки, подпись только для занятой
                if slot < INVENTORY_CAPACITY {
                    sounds.write(SoundCue::new(SoundKind::Hover));
                }
                view.set_hover(slot);
            }
            None => view.clear_hover(),
        }
    }
}
