//! Каталог ассетов и звуковые сигналы
//!
//! Симуляция не загружает ресурсы сама: host (рендер-мост) регистрирует
//! opaque handles под логическими ключами, а геймплейные системы только
//! ссылаются на них. Отсутствующий ключ — не ошибка: возвращаем заглушку
//! (пустая текстура / беззвучный звук) и пишем warning, геймплей продолжается.
//!
//! Звуки симуляция не проигрывает — она испускает `SoundCue` события,
//! host мапит их на свои sound handles через `SoundKind::key()`.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::log_warning;

/// Opaque handle текстуры, выданный host-ом.
///
/// 0 зарезервирован под заглушку (пустая/прозрачная текстура).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct TextureHandle(pub u32);

/// Opaque handle звука, выданный host-ом. 0 — беззвучная заглушка.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct SoundHandle(pub u32);

pub const PLACEHOLDER_TEXTURE: TextureHandle = TextureHandle(0);
pub const PLACEHOLDER_SOUND: SoundHandle = SoundHandle(0);

/// Стандартные ключи текстур уровня.
pub const TEXTURE_KEYS: [&str; 5] = ["player", "platform", "background", "bullet", "sniper_rifle"];

/// Стандартные ключи звуков.
pub const SOUND_KEYS: [&str; 3] = ["jump", "shoot", "hover"];

/// Каталог зарегистрированных ассетов (логический ключ → handle)
///
/// Заполняется host-ом до старта игрового цикла. Lookup по отсутствующему
/// ключу возвращает заглушку и логирует warning — missing asset не фатален.
#[derive(Resource, Debug, Clone, Default)]
pub struct AssetCatalog {
    textures: HashMap<String, TextureHandle>,
    sounds: HashMap<String, SoundHandle>,
}

impl AssetCatalog {
    pub fn register_texture(&mut self, key: &str, handle: TextureHandle) {
        self.textures.insert(key.to_string(), handle);
    }

    pub fn register_sound(&mut self, key: &str, handle: SoundHandle) {
        self.sounds.insert(key.to_string(), handle);
    }

    /// Текстура по ключу. Отсутствует — заглушка + warning.
    pub fn texture(&self, key: &str) -> TextureHandle {
        match self.textures.get(key) {
            Some(handle) => *handle,
            None => {
                log_warning(&format!("⚠️ Texture '{}' not registered, using placeholder", key));
                PLACEHOLDER_TEXTURE
            }
        }
    }

    /// Звук по ключу. Отсутствует — беззвучная заглушка + warning.
    pub fn sound(&self, key: &str) -> SoundHandle {
        match self.sounds.get(key) {
            Some(handle) => *handle,
            None => {
                log_warning(&format!("⚠️ Sound '{}' not registered, using placeholder", key));
                PLACEHOLDER_SOUND
            }
        }
    }
}

/// Какой звук проиграть
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Jump,
    Shoot,
    Hover,
}

impl SoundKind {
    /// Логический ключ для lookup в каталоге host-а
    pub fn key(&self) -> &'static str {
        match self {
            SoundKind::Jump => "jump",
            SoundKind::Shoot => "shoot",
            SoundKind::Hover => "hover",
        }
    }
}

/// Событие: симуляция просит host проиграть звук
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue {
    pub kind: SoundKind,
}

impl SoundCue {
    pub fn new(kind: SoundKind) -> Self {
        Self { kind }
    }
}
