//! GRIMHOLD Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless)
//!
//! Два контроллера персонажей:
//! - Hostile agent: Patrol / Chase / Attack / Flee, action gate, attack cooldown
//! - Player locomotion: walk / run / jump / roll, blend гравитации, roll cooldown
//!
//! Контроллеры общаются с миром только через capabilities
//! (WorldQueries, Pathing, Mover, AnimationSink), физика — Rapier или headless.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::{NoUserData, RapierPhysicsPlugin};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod error;
pub mod logger;
pub mod physics;
pub mod player;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_hostile_agent, AIPlugin, AgentAttacked, AgentConfig, AgentDied, AgentState, AttackKind,
    DamageAgent, HostileAgent,
};
pub use error::SimulationError;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter, MemoryLogger,
};
pub use physics::{
    spawn_ground, BodyBackend, Displacement, GroundPatch, GroundState, HeadlessTerrain, PathingAgent,
};
pub use player::{
    spawn_camera, spawn_player, LocomotionConfig, LocomotionMode, Player, PlayerCamera,
    PlayerInputEvent, PlayerLocomotion, PlayerPlugin,
};
pub use shared::{agent_params, player_params, AnimationParams, Cooldown};

/// Порядок фаз внутри FixedUpdate тика
///
/// Sense → Input → Decide → Move → Apply
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Ground detection + результат Rapier controller'а
    Sense,
    /// PlayerInputEvent → LocomotionInput
    Input,
    /// AI тик + player locomotion тик
    Decide,
    /// Pathing → displacement
    Move,
    /// Displacement → Transform / Rapier controller
    Apply,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Хост приносит время (MinimalPlugins или DefaultPlugins). Для
/// `BodyBackend::Rapier` тел хост добавляет `RapierPhysicsPlugin`
/// (schedule по умолчанию, PostUpdate) и спавнит пол через `spawn_ground`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .init_resource::<HeadlessTerrain>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sense,
                    SimulationSet::Input,
                    SimulationSet::Decide,
                    SimulationSet::Move,
                    SimulationSet::Apply,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    (physics::detect_ground_headless, physics::read_character_output)
                        .in_set(SimulationSet::Sense),
                    physics::follow_pathing.in_set(SimulationSet::Move),
                    physics::apply_displacement.in_set(SimulationSet::Apply),
                ),
            )
            // Контроллеры
            .add_plugins((AIPlugin, PlayerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Частота fixed тика симуляции
pub const SIMULATION_HZ: f64 = 60.0;

/// Создаёт minimal Bevy App для headless симуляции
///
/// Тела двигаются без Rapier (`BodyBackend::Headless`).
pub fn create_headless_app(seed: u64) -> App {
    build_app(seed, BodyBackend::Headless)
}

/// Headless App с Rapier физикой (`BodyBackend::Rapier` тела)
///
/// Пол для Rapier тел спавнит хост: `spawn_ground`.
pub fn create_rapier_app(seed: u64) -> App {
    build_app(seed, BodyBackend::Rapier)
}

/// MinimalPlugins + ManualDuration: один `app.update()` = ровно один fixed тик.
/// First/event_update_system крутятся как в обычном App, очереди событий чистятся.
fn build_app(seed: u64, backend: BodyBackend) -> App {
    init_logger();

    let timestep = Time::<Fixed>::from_hz(SIMULATION_HZ).timestep();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep))
        .add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed));

    if backend == BodyBackend::Rapier {
        // PostUpdate: character controller + step после FixedUpdate тика
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    }

    app.finish();
    app.cleanup();

    // Startup + первый кадр часов (delta = 0, fixed тиков нет)
    app.update();

    app
}

/// Прогнать `ticks` fixed тиков (один `app.update()` на тик)
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Компоненты T сортируются по Entity index и сериализуются через Debug.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
