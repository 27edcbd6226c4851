//! Locomotion modes: Free / Jumping / Rolling
//!
//! Jump и roll — варианты одного enum, одновременно они невозможны
//! по построению. Правила активации собраны в одной pure функции.

use bevy::prelude::*;

use super::components::LocomotionConfig;

/// Активный прыжок
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct JumpArc {
    /// Время с момента старта (двигается в gravity фазе)
    pub elapsed: f32,
    /// Текущая jump force (растёт пока стоим на земле)
    pub force: f32,
}

/// Активный перекат
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RollArc {
    /// Сколько осталось (секунды)
    pub remaining: f32,
    pub speed: f32,
    /// Фиксируется один раз на входе
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum LocomotionMode {
    #[default]
    Free,
    Jumping(JumpArc),
    Rolling(RollArc),
}

impl LocomotionMode {
    pub fn is_jumping(&self) -> bool {
        matches!(self, LocomotionMode::Jumping(_))
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self, LocomotionMode::Rolling(_))
    }
}

/// Какой mode включить в этом тике
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Activation {
    Jump,
    Roll,
}

/// Таблица активации
///
/// - Jump: grounded, не в прыжке и не в перекате
/// - Roll: не в перекате, не в прыжке, roll cooldown истёк
/// - Оба нажаты в одном тике: jump проверяется первым
pub fn select_activation(
    mode: &LocomotionMode,
    jump_pressed: bool,
    roll_pressed: bool,
    grounded: bool,
    roll_ready: bool,
) -> Option<Activation> {
    if *mode != LocomotionMode::Free {
        return None;
    }

    if jump_pressed && grounded {
        return Some(Activation::Jump);
    }

    if roll_pressed && roll_ready {
        return Some(Activation::Roll);
    }

    None
}

/// Гравитация внутри прыжка
///
/// До jump_time — jump_gravity, дальше линейный blend к gravity
/// за gravity_transition_time. После окна — ровно gravity.
pub fn jump_phase_gravity(elapsed: f32, config: &LocomotionConfig) -> f32 {
    if elapsed < config.jump_time {
        return config.jump_gravity;
    }

    let past = elapsed - config.jump_time;
    if past >= config.gravity_transition_time {
        return config.gravity;
    }

    let t = past / config.gravity_transition_time;
    config.jump_gravity * (1.0 - t) + config.gravity * t
}
