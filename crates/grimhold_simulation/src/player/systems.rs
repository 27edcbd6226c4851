//! Player systems: input → locomotion tick, spawn helpers

use bevy::prelude::*;

use super::components::{LocomotionConfig, Player, PlayerCamera};
use super::controller::{LocomotionEnv, PlayerLocomotion};
use super::input::{LocomotionInput, PlayerInputEvent};
use crate::physics::{rapier_character_body, BodyBackend, Displacement, GroundState};
use crate::shared::collision::player_groups;
use crate::shared::AnimationParams;

/// Система: PlayerInputEvent → LocomotionInput
///
/// Все события за тик применяются по порядку (edge нажатия копятся).
pub fn collect_player_input(
    mut input_events: EventReader<PlayerInputEvent>,
    mut players: Query<&mut LocomotionInput, With<Player>>,
) {
    for event in input_events.read() {
        for mut input in players.iter_mut() {
            input.apply_event(event);
        }
    }
}

/// Система: один locomotion тик для каждого игрока
///
/// Yaw камеры берём с PlayerCamera (если она одна в мире).
pub fn tick_player_locomotion(
    mut players: Query<
        (
            &Transform,
            &GroundState,
            &LocomotionConfig,
            &mut PlayerLocomotion,
            &mut LocomotionInput,
            &mut Displacement,
            &mut AnimationParams,
        ),
        With<Player>,
    >,
    cameras: Query<&Transform, (With<PlayerCamera>, Without<Player>)>,
    time: Res<Time<Fixed>>,
) {
    let yaw = cameras.single().ok().map(camera_yaw);
    let delta = time.delta_secs();

    for (transform, ground, config, mut locomotion, mut input, mut displacement, mut animation) in
        players.iter_mut()
    {
        let env = LocomotionEnv {
            grounded: ground.grounded,
            rotation: transform.rotation,
            camera_yaw: yaw,
            delta,
        };

        locomotion.tick(config, &mut input, env, &mut *displacement, &mut *animation);
    }
}

/// Yaw камеры вокруг Y (radians)
pub fn camera_yaw(transform: &Transform) -> f32 {
    let (yaw, _pitch, _roll) = transform.rotation.to_euler(EulerRot::YXZ);
    yaw
}

/// Spawn helper для игрока
///
/// Создает entity с полным набором компонентов:
/// - Transform + Player + LocomotionConfig + PlayerLocomotion
/// - LocomotionInput (latched input)
/// - GroundState + Displacement (физика)
/// - AnimationParams
/// - CollisionGroups (+ Rapier body если backend = Rapier)
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec3,
    config: LocomotionConfig,
    backend: BodyBackend,
) -> Entity {
    let locomotion = PlayerLocomotion::new(&config);

    let mut entity = commands.spawn((
        Transform::from_translation(position),
        Player,
        config,
        locomotion,
        LocomotionInput::default(),
        GroundState::default(),
        Displacement::default(),
        AnimationParams::default(),
        player_groups(),
    ));

    if backend == BodyBackend::Rapier {
        entity.insert(rapier_character_body(player_groups()));
    }

    entity.id()
}

/// Spawn helper для камеры игрока (только transform, рендера нет)
pub fn spawn_camera(commands: &mut Commands, transform: Transform) -> Entity {
    commands.spawn((transform, PlayerCamera)).id()
}
