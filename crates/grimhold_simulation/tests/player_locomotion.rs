//! Интеграционные тесты player locomotion
//!
//! Плоский headless пол на y = 0, input через PlayerInputEvent.

use bevy::prelude::*;
use grimhold_simulation::player::facing;
use grimhold_simulation::{
    create_headless_app, player_params, run_fixed_ticks, spawn_camera, spawn_player,
    AnimationParams, BodyBackend, GroundPatch, HeadlessTerrain, LocomotionConfig, PlayerInputEvent,
    PlayerLocomotion,
};

fn setup() -> (App, Entity) {
    let mut app = create_headless_app(11);
    let player = {
        let world = app.world_mut();
        let player = {
            let mut commands = world.commands();
            spawn_player(&mut commands, Vec3::ZERO, LocomotionConfig::default(), BodyBackend::Headless)
        };
        world.flush();
        player
    };
    // Один тик чтобы ground state устоялся
    run_fixed_ticks(&mut app, 1);
    (app, player)
}

fn send(app: &mut App, event: PlayerInputEvent) {
    app.world_mut().send_event(event);
}

fn anim(app: &App, player: Entity, name: &str) -> bool {
    app.world().get::<AnimationParams>(player).unwrap().get_bool(name)
}

fn position(app: &App, player: Entity) -> Vec3 {
    app.world().get::<Transform>(player).unwrap().translation
}

#[test]
fn test_idle_player_stays_on_ground() {
    let (mut app, player) = setup();
    run_fixed_ticks(&mut app, 60);

    assert_eq!(position(&app, player), Vec3::ZERO);
    assert!(anim(&app, player, player_params::IS_IDLE));
    assert!(!anim(&app, player, player_params::IS_WALKING));
}

#[test]
fn test_walk_and_run_speeds() {
    let (mut app, player) = setup();

    send(&mut app, PlayerInputEvent {
        move_direction: Vec2::new(0.0, -1.0),
        ..default()
    });
    run_fixed_ticks(&mut app, 60);

    let walked = position(&app, player);
    assert!((walked.z + 2.0).abs() < 0.05, "walked to {:?}", walked);
    assert!(walked.x.abs() < 1.0e-4);
    assert!(anim(&app, player, player_params::IS_WALKING));

    send(&mut app, PlayerInputEvent {
        move_direction: Vec2::new(0.0, -1.0),
        run: true,
        ..default()
    });
    run_fixed_ticks(&mut app, 60);

    let ran = position(&app, player);
    assert!((ran.z - walked.z + 4.0).abs() < 0.05, "ran to {:?}", ran);
    assert!(anim(&app, player, player_params::IS_RUNNING));
    assert!(!anim(&app, player, player_params::IS_WALKING));

    // Отпустили Shift — снова шаг
    send(&mut app, PlayerInputEvent {
        move_direction: Vec2::new(0.0, -1.0),
        run: false,
        ..default()
    });
    run_fixed_ticks(&mut app, 1);
    assert!(anim(&app, player, player_params::IS_WALKING));
    assert!(!anim(&app, player, player_params::IS_RUNNING));
}

#[test]
fn test_jump_arc_returns_to_ground() {
    let (mut app, player) = setup();

    send(&mut app, PlayerInputEvent {
        jump: true,
        roll: true,
        ..default()
    });
    run_fixed_ticks(&mut app, 1);

    assert!(anim(&app, player, player_params::IS_JUMPING));
    assert!(!anim(&app, player, player_params::IS_ROLLING));
    assert!(!anim(&app, player, player_params::IS_IDLE));

    let mut peak: f32 = 0.0;
    for _ in 0..120 {
        run_fixed_ticks(&mut app, 1);
        peak = peak.max(position(&app, player).y);
    }

    assert!(peak > 0.5, "peak = {}", peak);
    assert_eq!(position(&app, player).y, 0.0);
    assert!(!anim(&app, player, player_params::IS_JUMPING));
    assert!(anim(&app, player, player_params::IS_IDLE));
}

#[test]
fn test_roll_cooldown_gates_second_roll() {
    let (mut app, player) = setup();

    send(&mut app, PlayerInputEvent {
        roll: true,
        ..default()
    });
    run_fixed_ticks(&mut app, 1);
    assert!(anim(&app, player, player_params::IS_ROLLING));

    let mut ticks = 0;
    while anim(&app, player, player_params::IS_ROLLING) {
        run_fixed_ticks(&mut app, 1);
        ticks += 1;
        assert!(ticks < 60, "roll never finished");
    }

    // Перекат уехал вперёд (facing по умолчанию = -Z)
    assert!(position(&app, player).z < -4.0);

    // Внутри cooldown'а — отказ
    send(&mut app, PlayerInputEvent {
        roll: true,
        ..default()
    });
    run_fixed_ticks(&mut app, 1);
    assert!(!anim(&app, player, player_params::IS_ROLLING));

    run_fixed_ticks(&mut app, 15);
    send(&mut app, PlayerInputEvent {
        roll: true,
        ..default()
    });
    run_fixed_ticks(&mut app, 1);
    assert!(anim(&app, player, player_params::IS_ROLLING));
}

#[test]
fn test_movement_follows_camera_yaw() {
    let (mut app, player) = setup();
    {
        let world = app.world_mut();
        {
            let mut commands = world.commands();
            spawn_camera(
                &mut commands,
                Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            );
        }
        world.flush();
    }

    send(&mut app, PlayerInputEvent {
        move_direction: Vec2::new(0.0, -1.0),
        ..default()
    });
    run_fixed_ticks(&mut app, 60);

    let moved = position(&app, player);
    assert!(moved.x < -1.9, "moved to {:?}", moved);
    assert!(moved.z.abs() < 0.05);

    // Повернулся к направлению движения
    let rotation = app.world().get::<Transform>(player).unwrap().rotation;
    assert!(facing(rotation).distance(Vec3::NEG_X) < 1.0e-2);
}

#[test]
fn test_walking_off_ledge_falls() {
    let (mut app, player) = setup();
    app.world_mut().resource_mut::<HeadlessTerrain>().patches =
        vec![GroundPatch::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 0.0)];

    send(&mut app, PlayerInputEvent {
        move_direction: Vec2::new(1.0, 0.0),
        ..default()
    });
    run_fixed_ticks(&mut app, 120);

    let fallen = position(&app, player);
    assert!(fallen.x > 1.0);
    assert!(fallen.y < -0.5, "fell to {:?}", fallen);

    let locomotion = app.world().get::<PlayerLocomotion>(player).unwrap();
    assert!(locomotion.vertical_velocity < 0.0);
}
