//! Hostile agent компоненты: state, config, attack set

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shared::agent_params;
use crate::shared::collision::{LAYER_GROUND, LAYER_PLAYER};
use crate::shared::Cooldown;

/// Behavior state агента
///
/// Patrol/Chase/Attack выводятся каждый тик из range bools.
/// Flee — терминальный для поведения (выход только в смерть).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AgentState {
    /// Бродим между случайными точками
    #[default]
    Patrol,
    /// Игрок в sight range — идём к нему
    Chase,
    /// Игрок в sight И attack range — стоим и бьём
    Attack,
    /// Health ≤ flee threshold — бежим к выходу
    Flee,
}

/// Атаки агента (выбор uniform random)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackKind {
    Punch,
    Pound,
}

impl AttackKind {
    pub const ALL: [AttackKind; 2] = [AttackKind::Punch, AttackKind::Pound];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Имя animator trigger'а
    pub fn trigger(&self) -> &'static str {
        match self {
            AttackKind::Punch => agent_params::PUNCH,
            AttackKind::Pound => agent_params::POUND,
        }
    }
}

/// Tuning агента
///
/// Preconditions (не валидируются в runtime): ranges ≥ 0,
/// time_between_attacks > 0, pause_time ≥ 0.
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Радиус обнаружения игрока (метры)
    pub sight_range: f32,
    /// Радиус атаки (метры)
    pub attack_range: f32,
    /// Полуразмер квадрата поиска patrol точки (метры)
    pub walk_point_range: f32,
    /// Cooldown между атаками (секунды)
    pub time_between_attacks: f32,
    /// Минимальный интервал между решениями (секунды)
    pub pause_time: f32,
    /// Health порог бегства (меняется от уровня к уровню)
    pub flee_health_threshold: f32,
    /// Patrol точка считается достигнутой ближе этого (метры)
    pub arrival_distance: f32,
    /// Длина луча вниз для проверки patrol точки (метры)
    pub ground_check_distance: f32,
    /// Слой игрока для overlap запросов
    pub player_mask: u32,
    /// Слой пола для ground check
    pub ground_mask: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sight_range: 10.0,
            attack_range: 2.0,
            walk_point_range: 10.0,
            time_between_attacks: 1.5,
            pause_time: 3.0,
            flee_health_threshold: 20.0,
            arrival_distance: 1.0,
            ground_check_distance: 2.0,
            player_mask: LAYER_PLAYER,
            ground_mask: LAYER_GROUND,
        }
    }
}

/// Hostile agent — health, behavior state, timing gates
///
/// Health может уйти в минус; значение имеет только сравнение ≤ 0.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HostileAgent {
    pub health: f32,
    pub is_dead: bool,
    pub state: AgentState,

    /// Результат overlap запросов последнего решения
    pub player_in_sight: bool,
    pub player_in_attack: bool,

    /// Текущая patrol точка (None = надо искать новую)
    pub walk_target: Option<Vec3>,

    pub attack_cooldown: Cooldown,
    /// Пауза после любого решения (pause_time)
    pub action_gate: Cooldown,

    /// Точка выхода для Flee (задаётся снаружи, уровнем)
    pub flee_exit: Option<Vec3>,
}

impl HostileAgent {
    pub fn new(health: f32, config: &AgentConfig) -> Self {
        Self {
            health,
            is_dead: false,
            state: AgentState::Patrol,
            player_in_sight: false,
            player_in_attack: false,
            walk_target: None,
            attack_cooldown: Cooldown::new(config.time_between_attacks),
            action_gate: Cooldown::new(config.pause_time),
            flee_exit: None,
        }
    }

    pub fn is_fleeing(&self) -> bool {
        self.state == AgentState::Flee
    }

    pub fn set_flee_exit(&mut self, point: Vec3) {
        self.flee_exit = Some(point);
    }
}

impl Default for HostileAgent {
    fn default() -> Self {
        Self::new(100.0, &AgentConfig::default())
    }
}
