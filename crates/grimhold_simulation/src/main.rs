//! Headless симуляция GRIMHOLD
//!
//! Игрок идёт к hostile agent'у, агент замечает его и атакует,
//! затем получает урон и убегает. Всё без рендера и без Rapier.

use bevy::prelude::*;
use grimhold_simulation::{
    agent_params, create_headless_app, log_info, player_params, run_fixed_ticks,
    spawn_hostile_agent, spawn_player, AgentAttacked, AgentConfig, AnimationParams, BodyBackend,
    DamageAgent, HostileAgent, LocomotionConfig, PlayerInputEvent, SimulationSet,
};

/// Счётчик атак для отчёта (события живут два тика, копим сами)
#[derive(Resource, Default)]
struct AttackTally(usize);

fn count_attacks(mut events: EventReader<AgentAttacked>, mut tally: ResMut<AttackTally>) {
    tally.0 += events.read().count();
}

fn main() {
    let seed = 42;
    let mut app = create_headless_app(seed);
    app.init_resource::<AttackTally>()
        .add_systems(FixedUpdate, count_attacks.after(SimulationSet::Decide));
    log_info(&format!("Starting GRIMHOLD headless simulation (seed: {})", seed));

    let (player, agent) = {
        let world = app.world_mut();
        let ids = {
            let mut commands = world.commands();
            let player = spawn_player(
                &mut commands,
                Vec3::ZERO,
                LocomotionConfig::default(),
                BodyBackend::Headless,
            );
            let agent = spawn_hostile_agent(
                &mut commands,
                Vec3::new(0.0, 0.0, -12.0),
                100.0,
                AgentConfig::default(),
                BodyBackend::Headless,
            );
            (player, agent)
        };
        world.flush();
        ids
    };

    // Игрок идёт вперёд (-Z) к агенту
    app.world_mut().send_event(PlayerInputEvent {
        move_direction: Vec2::new(0.0, -1.0),
        ..default()
    });

    for second in 0..10 {
        run_fixed_ticks(&mut app, 60);

        let world = app.world_mut();
        let attacks = world.resource::<AttackTally>().0;

        let player_position = world.get::<Transform>(player).map(|t| t.translation);
        let agent_state = world.get::<HostileAgent>(agent).map(|a| (a.state, a.health));
        let walking = world
            .get::<AnimationParams>(player)
            .is_some_and(|params| params.get_bool(player_params::IS_WALKING));

        log_info(&format!(
            "t={}s player={:?} walking={} agent={:?} attacks={}",
            second + 1,
            player_position,
            walking,
            agent_state,
            attacks
        ));

        if second == 5 {
            // Останавливаемся и бьём агента до порога бегства
            world.send_event(PlayerInputEvent::default());
            world.send_event(DamageAgent {
                target: agent,
                amount: 85.0,
            });
        }
    }

    let running = app
        .world()
        .get::<AnimationParams>(agent)
        .is_some_and(|params| params.get_bool(agent_params::IS_RUNNING));
    log_info(&format!("Simulation complete! agent fleeing: {}", running));
}
