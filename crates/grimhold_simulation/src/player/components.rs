//! Player components: markers + locomotion tuning

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component для player-controlled entity
///
/// # Архитектурная заметка
/// - AI systems резолвят позицию игрока через `With<Player>`
/// - Input/locomotion systems работают только с `With<Player>`
///
/// Ровно один Player в мире, иначе агенты не инициализируются.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker для камеры игрока
///
/// Если есть: движение и roll direction считаются относительно yaw камеры.
/// Если нет: относительно мировых осей.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerCamera;

/// Tuning locomotion контроллера
///
/// Preconditions (не валидируются): скорости ≥ 0, jump_time > 0,
/// roll_time > 0, gravity_transition_time > 0.
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Скорость шага (м/с)
    pub walk_speed: f32,
    /// Скорость бега (м/с)
    pub run_speed: f32,
    /// Скорость поворота при ходьбе (slerp rate, 1/с)
    pub walk_rotate_speed: f32,
    /// Скорость поворота при беге
    pub run_rotate_speed: f32,
    /// Обычная гравитация (м/с², отрицательная)
    pub gravity: f32,
    /// Крутая гравитация в активном окне прыжка
    pub jump_gravity: f32,
    /// Стартовая вертикальная скорость прыжка
    pub jump_force: f32,
    /// Прирост jump force за секунду (пока стоим на земле)
    pub jump_acceleration: f32,
    /// Активное окно прыжка (секунды)
    pub jump_time: f32,
    /// Стартовая скорость переката
    pub roll_speed: f32,
    /// Прирост скорости переката за секунду
    pub roll_acceleration: f32,
    /// Длительность переката (секунды)
    pub roll_time: f32,
    /// Окно перехода jump_gravity → gravity после jump_time
    pub gravity_transition_time: f32,
    /// Cooldown между перекатами (с момента окончания)
    pub roll_cooldown: f32,
    /// Вертикальная скорость "прилипания" к земле
    pub ground_adhesion: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 4.0,
            walk_rotate_speed: 15.0,
            run_rotate_speed: 20.0,
            gravity: -9.81,
            jump_gravity: -30.0,
            jump_force: 9.0,
            jump_acceleration: 0.5,
            jump_time: 0.65,
            roll_speed: 8.5,
            roll_acceleration: 1.0,
            roll_time: 0.5,
            gravity_transition_time: 0.8,
            roll_cooldown: 0.2,
            ground_adhesion: -2.0,
        }
    }
}
