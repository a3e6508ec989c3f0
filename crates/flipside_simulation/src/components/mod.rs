//! ECS Components, общие для нескольких подсистем
//!
//! Организация по доменам:
//! - actor: размер и визуальное состояние актора (ActorSize, ActorVisual)
//!
//! Узкоспециализированные компоненты живут в своих подсистемах
//! (MotionState — motion, WeaponRig — weapons, и т.д.).

pub mod actor;

// Re-exports для удобного импорта
pub use actor::*;
