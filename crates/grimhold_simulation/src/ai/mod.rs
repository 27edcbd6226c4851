//! Hostile agent AI module
//!
//! Patrol → Chase → Attack по range bools, Flee по health порогу.
//! Решения гейтятся pause_time, атаки — time_between_attacks.

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod decision;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{AgentConfig, AgentState, AttackKind, HostileAgent};
pub use controller::{AgentTickContext, AgentTickOutcome};
pub use decision::{AgentCommand, Decision, DecisionContext, Perception, TickPhase};
pub use events::{AgentAttacked, AgentDied, DamageAgent};
pub use systems::spawn_hostile_agent;

use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. bind_new_agents — проверка игрока + стартовые animator параметры
/// 2. apply_agent_damage — DamageAgent → health, AgentDied
/// 3. tick_hostile_agents — FSM + команды pathing'у
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageAgent>()
            .add_event::<AgentDied>()
            .add_event::<AgentAttacked>();

        app.add_systems(
            FixedUpdate,
            (
                systems::bind_new_agents,
                systems::apply_agent_damage,
                systems::tick_hostile_agents,
            )
                .chain()
                .in_set(SimulationSet::Decide),
        );
    }
}
