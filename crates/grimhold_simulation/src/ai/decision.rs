//! Decision table агента — чистые функции без ECS
//!
//! (state, perception) → (next state, command). Все guard условия живут здесь,
//! контроллер только собирает входы и исполняет результат.

use bevy::prelude::*;

use super::components::AgentState;

/// Результат overlap запросов этого тика
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Perception {
    pub player_in_sight: bool,
    pub player_in_attack: bool,
}

/// Фаза тика до чтения сенсоров
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// Терминально: ничего не делаем
    Dead,
    /// Health ≤ threshold (или уже бежим)
    Flee,
    /// Action gate ещё не истёк
    Paused,
    /// Можно читать сенсоры и решать
    Decide,
}

/// Что агент просит у pathing/body в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentCommand {
    /// Не трогать pathing (предыдущая цель остаётся)
    Keep,
    /// Идти к точке
    MoveTo(Vec3),
    /// Стоять на месте и смотреть в направлении
    Hold { face: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionContext {
    pub position: Vec3,
    pub player_position: Vec3,
    /// Patrol точка (уже с принятым в этом тике sample'ом)
    pub walk_target: Option<Vec3>,
    pub attack_ready: bool,
    pub arrival_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub state: AgentState,
    pub command: AgentCommand,
    /// Patrol точка после решения (None = достигнута/не найдена)
    pub walk_target: Option<Vec3>,
    /// Выпустить ровно один attack signal
    pub fire_attack: bool,
}

/// Фиксированный порядок: смерть → бегство → gate → решение
pub fn classify(
    is_dead: bool,
    fleeing: bool,
    health: f32,
    flee_threshold: f32,
    gate_ready: bool,
) -> TickPhase {
    if is_dead {
        TickPhase::Dead
    } else if fleeing || health <= flee_threshold {
        TickPhase::Flee
    } else if !gate_ready {
        TickPhase::Paused
    } else {
        TickPhase::Decide
    }
}

/// Range bools → state
///
/// Attack требует ОБА range. Attack-без-sight (attack_range > sight_range
/// конфиг) не выбирает ничего: тик проходит без решения.
pub fn select_state(perception: Perception) -> Option<AgentState> {
    match (perception.player_in_sight, perception.player_in_attack) {
        (false, false) => Some(AgentState::Patrol),
        (true, false) => Some(AgentState::Chase),
        (true, true) => Some(AgentState::Attack),
        (false, true) => None,
    }
}

/// Полное решение для выбранного state
pub fn decide(state: AgentState, ctx: DecisionContext) -> Decision {
    match state {
        AgentState::Patrol => {
            let Some(target) = ctx.walk_target else {
                // Точку отклонил ground check — новая попытка в следующем решении
                return Decision {
                    state,
                    command: AgentCommand::Keep,
                    walk_target: None,
                    fire_attack: false,
                };
            };

            let reached = horizontal_distance(ctx.position, target) < ctx.arrival_distance;

            Decision {
                state,
                command: AgentCommand::MoveTo(target),
                walk_target: if reached { None } else { Some(target) },
                fire_attack: false,
            }
        }

        AgentState::Chase => Decision {
            state,
            command: AgentCommand::MoveTo(ctx.player_position),
            walk_target: ctx.walk_target,
            fire_attack: false,
        },

        AgentState::Attack => Decision {
            state,
            command: AgentCommand::Hold {
                face: ctx.player_position - ctx.position,
            },
            walk_target: ctx.walk_target,
            fire_attack: ctx.attack_ready,
        },

        // Flee не решается таблицей: classify() отсекает его раньше
        AgentState::Flee => Decision {
            state,
            command: AgentCommand::Keep,
            walk_target: ctx.walk_target,
            fire_attack: false,
        },
    }
}

pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
