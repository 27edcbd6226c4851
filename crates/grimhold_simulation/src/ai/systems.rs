//! AI systems: bind, damage, tick

use bevy::ecs::error::BevyError;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{AgentConfig, HostileAgent};
use super::controller::AgentTickContext;
use super::events::{AgentAttacked, AgentDied, DamageAgent};
use crate::error::resolve_player_position;
use crate::physics::{
    rapier_character_body, BodyBackend, Displacement, HeadlessTerrain, Mover, Pathing, PathingAgent,
};
use crate::player::Player;
use crate::shared::collision::agent_groups;
use crate::shared::{
    agent_params, AnimationParams, AnimationSink, HeadlessWorldQueries, RapierWorldQueries,
    WorldQueries,
};
use crate::DeterministicRng;

/// Система: инициализация новых агентов
///
/// Агент без игрока в мире: Err, Bevy error handler валит приложение.
/// Стартовые animator параметры: die/isWalking/isRunning = false.
pub fn bind_new_agents(
    mut agents: Query<(Entity, &mut AnimationParams), Added<HostileAgent>>,
    players: Query<&Transform, With<Player>>,
) -> Result<(), BevyError> {
    if agents.is_empty() {
        return Ok(());
    }

    if let Err(err) = resolve_player_position(&players) {
        crate::log_error(&format!("AI: cannot bind hostile agents: {}", err));
        return Err(err.into());
    }

    for (entity, mut animation) in agents.iter_mut() {
        animation.set_bool(agent_params::DIE, false);
        animation.set_bool(agent_params::IS_WALKING, false);
        animation.set_bool(agent_params::IS_RUNNING, false);

        crate::log(&format!("AI: hostile agent {:?} bound to player", entity));
    }

    Ok(())
}

/// Система: apply damage от DamageAgent событий
///
/// Мёртвые агенты игнорируют урон. На смерти останавливаем pathing
/// и отправляем AgentDied ровно один раз.
pub fn apply_agent_damage(
    mut damage_events: EventReader<DamageAgent>,
    mut died_events: EventWriter<AgentDied>,
    mut agents: Query<(&mut HostileAgent, &mut AnimationParams, Option<&mut PathingAgent>)>,
) {
    for event in damage_events.read() {
        let Ok((mut agent, mut animation, pathing)) = agents.get_mut(event.target) else {
            crate::log_warning(&format!(
                "AI: DamageAgent target {:?} is not a hostile agent",
                event.target
            ));
            continue;
        };

        if agent.take_damage(event.amount, &mut *animation) {
            if let Some(mut pathing) = pathing {
                pathing.stop();
            }

            died_events.write(AgentDied {
                entity: event.target,
            });
            crate::log_info(&format!("AI: hostile agent {:?} died", event.target));
        }
    }
}

/// Система: тик всех hostile agents
///
/// World queries: Rapier если есть RapierContext, иначе headless
/// (тела с CollisionGroups + HeadlessTerrain).
pub fn tick_hostile_agents(
    mut agents: Query<(
        Entity,
        &Transform,
        &mut HostileAgent,
        &AgentConfig,
        &mut PathingAgent,
        &mut Displacement,
        &mut AnimationParams,
    )>,
    players: Query<&Transform, With<Player>>,
    bodies: Query<(&Transform, &CollisionGroups)>,
    terrain: Res<HeadlessTerrain>,
    rapier_context: ReadRapierContext,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut attack_events: EventWriter<AgentAttacked>,
) -> Result<(), BevyError> {
    if agents.is_empty() {
        return Ok(());
    }

    let player_position = resolve_player_position(&players)?;
    let delta = time.delta_secs();

    let rapier = rapier_context.single().ok();
    let rapier_queries = rapier.as_ref().map(|context| RapierWorldQueries::new(context));
    let headless_queries;
    let world: &dyn WorldQueries = match &rapier_queries {
        Some(queries) => queries,
        None => {
            headless_queries = HeadlessWorldQueries::new(
                bodies
                    .iter()
                    .map(|(transform, groups)| (transform.translation, groups.memberships.bits())),
                &terrain,
            );
            &headless_queries
        }
    };

    for (entity, transform, mut agent, config, mut pathing, mut displacement, mut animation) in
        agents.iter_mut()
    {
        let ctx = AgentTickContext {
            position: transform.translation,
            player_position,
            moved_last_tick: displacement.moved_horizontally(),
            delta,
        };

        let outcome = agent.tick(
            config,
            ctx,
            world,
            &mut *pathing,
            &mut *animation,
            &mut rng.rng,
        );

        if let Some(rotation) = outcome.facing {
            displacement.rotate_to(rotation);
        }

        if let Some(attack) = outcome.attack {
            crate::log(&format!("AI: {:?} attacks with {:?}", entity, attack));
            attack_events.write(AgentAttacked { agent: entity, attack });
        }
    }

    Ok(())
}

/// Spawn helper для hostile agent
///
/// Создает entity с полным набором компонентов:
/// - Transform + HostileAgent + AgentConfig
/// - PathingAgent + Displacement (движение)
/// - AnimationParams (сигналы animator'у)
/// - CollisionGroups (+ Rapier body если backend = Rapier)
pub fn spawn_hostile_agent(
    commands: &mut Commands,
    position: Vec3,
    health: f32,
    config: AgentConfig,
    backend: BodyBackend,
) -> Entity {
    let agent = HostileAgent::new(health, &config);

    let mut entity = commands.spawn((
        Transform::from_translation(position),
        agent,
        config,
        PathingAgent::default(),
        Displacement::default(),
        AnimationParams::default(),
        agent_groups(),
    ));

    if backend == BodyBackend::Rapier {
        entity.insert(rapier_character_body(agent_groups()));
    }

    entity.id()
}
