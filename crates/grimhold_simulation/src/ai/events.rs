//! AI Events — вход урона и выходы агента
//!
//! DamageAgent приходит от внешней damage логики (игрок, ловушки),
//! AgentDied/AgentAttacked читают UI, звук, combat numeric системы.

use bevy::prelude::*;

use super::components::AttackKind;

/// Нанести урон агенту
#[derive(Event, Debug, Clone)]
pub struct DamageAgent {
    pub target: Entity,
    pub amount: f32,
}

/// Агент умер (health ≤ 0), отправляется ровно один раз
#[derive(Event, Debug, Clone)]
pub struct AgentDied {
    pub entity: Entity,
}

/// Агент выпустил attack signal
#[derive(Event, Debug, Clone)]
pub struct AgentAttacked {
    pub agent: Entity,
    pub attack: AttackKind,
}
