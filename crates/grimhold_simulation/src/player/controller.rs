//! Player locomotion controller — один тик движения
//!
//! Порядок внутри тика:
//! 1. Roll cooldown timer
//! 2. Intents: run (level), jump/roll (edge) → select_activation
//! 3. Jump phase (вертикальный импульс пока стоим на земле)
//! 4. Roll phase (фиксированное направление, скорость растёт)
//! 5. Grounded movement (если не катимся): slerp поворот + шаг/бег
//! 6. Gravity: adhesion на земле, jump gravity blend, вертикальный шаг
//! 7. Animation bools
//!
//! Transform не трогаем: всё уходит в Mover (displacement + rotation).

use bevy::prelude::*;

use super::components::LocomotionConfig;
use super::input::LocomotionInput;
use super::modes::{self, Activation, JumpArc, LocomotionMode, RollArc};
use crate::physics::{yaw_rotation, Mover, MOTION_EPSILON};
use crate::shared::{player_params, AnimationSink, Cooldown};

/// Окружение тика (что host знает о теле)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionEnv {
    /// Grounded на начало тика
    pub grounded: bool,
    /// Текущий поворот тела
    pub rotation: Quat,
    /// Yaw камеры (None = мировые оси)
    pub camera_yaw: Option<f32>,
    pub delta: f32,
}

/// Что произошло в тике
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionOutcome {
    pub activated: Option<Activation>,
    pub landed: bool,
    pub roll_finished: bool,
}

/// Состояние locomotion контроллера игрока
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerLocomotion {
    pub mode: LocomotionMode,
    /// Накопленная вертикальная скорость (м/с)
    pub vertical_velocity: f32,
    pub is_running: bool,
    pub roll_cooldown: Cooldown,
}

impl PlayerLocomotion {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            mode: LocomotionMode::Free,
            vertical_velocity: 0.0,
            is_running: false,
            roll_cooldown: Cooldown::new(config.roll_cooldown),
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.mode.is_jumping()
    }

    pub fn is_rolling(&self) -> bool {
        self.mode.is_rolling()
    }

    pub fn tick(
        &mut self,
        config: &LocomotionConfig,
        input: &mut LocomotionInput,
        env: LocomotionEnv,
        mover: &mut dyn Mover,
        animation: &mut dyn AnimationSink,
    ) -> LocomotionOutcome {
        let mut outcome = LocomotionOutcome::default();
        let dt = env.delta;

        self.roll_cooldown.tick(dt);

        // Run — level-triggered: отпустили кнопку = перестали бежать
        self.is_running = input.run;

        let move_direction = camera_relative(input.move_direction, env.camera_yaw);
        let (jump_pressed, roll_pressed) = input.take_presses();

        outcome.activated = modes::select_activation(
            &self.mode,
            jump_pressed,
            roll_pressed,
            env.grounded,
            self.roll_cooldown.is_ready(),
        );

        match outcome.activated {
            Some(Activation::Jump) => {
                crate::log("Player: jump");
                self.mode = LocomotionMode::Jumping(JumpArc {
                    elapsed: 0.0,
                    force: config.jump_force,
                });
            }
            Some(Activation::Roll) => {
                let direction = move_direction.unwrap_or_else(|| facing(env.rotation));
                crate::log(&format!("Player: roll towards {:?}", direction));

                // Snap, без интерполяции
                if let Some(rotation) = yaw_rotation(direction) {
                    mover.rotate_to(rotation);
                }

                self.mode = LocomotionMode::Rolling(RollArc {
                    remaining: config.roll_time,
                    speed: config.roll_speed,
                    direction,
                });
            }
            None => {}
        }

        outcome.landed = self.jump_phase(config, env.grounded, dt);
        outcome.roll_finished = self.roll_phase(config, mover, dt);

        if !self.is_rolling() {
            self.grounded_movement(config, move_direction, env, mover);
        }

        self.apply_gravity(config, env.grounded, mover, dt);

        self.update_animation(input.move_direction, animation);

        outcome
    }

    /// Вертикальный импульс прыжка; true если в этом тике приземлились
    fn jump_phase(&mut self, config: &LocomotionConfig, grounded: bool, dt: f32) -> bool {
        let LocomotionMode::Jumping(arc) = &mut self.mode else {
            return false;
        };

        if !grounded {
            return false;
        }

        // Стартовали и снова на земле, падая вниз = приземление
        if arc.elapsed > 0.0 && self.vertical_velocity < 0.0 {
            self.mode = LocomotionMode::Free;
            crate::log("Player: landed");
            return true;
        }

        if arc.elapsed <= config.jump_time {
            self.vertical_velocity = arc.force;
            arc.force += config.jump_acceleration * dt;
        } else {
            self.mode = LocomotionMode::Free;
        }

        false
    }

    /// Шаг переката; true если перекат закончился в этом тике
    fn roll_phase(&mut self, config: &LocomotionConfig, mover: &mut dyn Mover, dt: f32) -> bool {
        let LocomotionMode::Rolling(arc) = &mut self.mode else {
            return false;
        };

        mover.move_by(arc.direction * arc.speed * dt);
        arc.speed += config.roll_acceleration * dt;
        arc.remaining -= dt;

        if arc.remaining <= 0.0 {
            self.mode = LocomotionMode::Free;
            self.roll_cooldown.start();
            crate::log("Player: roll finished");
            return true;
        }

        false
    }

    fn grounded_movement(
        &mut self,
        config: &LocomotionConfig,
        move_direction: Option<Vec3>,
        env: LocomotionEnv,
        mover: &mut dyn Mover,
    ) {
        let Some(direction) = move_direction else {
            return;
        };

        if let Some(target) = yaw_rotation(direction) {
            let rate = if self.is_running {
                config.run_rotate_speed
            } else {
                config.walk_rotate_speed
            };
            let t = (rate * env.delta).min(1.0);
            mover.rotate_to(env.rotation.slerp(target, t));
        }

        let speed = if self.is_running {
            config.run_speed
        } else {
            config.walk_speed
        };
        mover.move_by(direction * speed * env.delta);
    }

    fn apply_gravity(
        &mut self,
        config: &LocomotionConfig,
        grounded: bool,
        mover: &mut dyn Mover,
        dt: f32,
    ) {
        if grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = config.ground_adhesion;
        }

        match &mut self.mode {
            LocomotionMode::Jumping(arc) => {
                self.vertical_velocity += modes::jump_phase_gravity(arc.elapsed, config) * dt;
                arc.elapsed += dt;
            }
            LocomotionMode::Free | LocomotionMode::Rolling(_) => {
                self.vertical_velocity += config.gravity * dt;
            }
        }

        mover.move_by(Vec3::Y * self.vertical_velocity * dt);
    }

    fn update_animation(&self, raw_input: Vec2, animation: &mut dyn AnimationSink) {
        let is_moving = raw_input.length_squared() > 0.0;
        let free = self.mode == LocomotionMode::Free;

        animation.set_bool(player_params::IS_WALKING, is_moving && !self.is_running && free);
        animation.set_bool(player_params::IS_RUNNING, is_moving && self.is_running && free);
        animation.set_bool(player_params::IS_IDLE, !is_moving && free);
        animation.set_bool(player_params::IS_JUMPING, self.is_jumping());
        animation.set_bool(player_params::IS_ROLLING, self.is_rolling());
    }
}

/// Input (x right, y backward) → горизонтальное мировое направление
///
/// С камерой поворачиваем на её yaw. None если input нулевой.
pub fn camera_relative(input: Vec2, camera_yaw: Option<f32>) -> Option<Vec3> {
    let local = Vec3::new(input.x, 0.0, input.y);
    if local.length_squared() <= MOTION_EPSILON * MOTION_EPSILON {
        return None;
    }

    let world = match camera_yaw {
        Some(yaw) => Quat::from_rotation_y(yaw) * local,
        None => local,
    };

    let flat = Vec3::new(world.x, 0.0, world.z).normalize_or_zero();
    (flat != Vec3::ZERO).then_some(flat)
}

/// Куда смотрит тело (forward = -Z), в горизонтальной плоскости
pub fn facing(rotation: Quat) -> Vec3 {
    let forward = rotation * Vec3::NEG_Z;
    let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    if flat == Vec3::ZERO {
        Vec3::NEG_Z
    } else {
        flat
    }
}
