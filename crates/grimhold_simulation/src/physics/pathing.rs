//! Pathing capability — "двигайся к точке, сообщи о прибытии"
//!
//! Архитектура:
//! - AI пишет high-level intent через `Pathing` (move_to / stop)
//! - `follow_pathing` превращает intent в `Displacement` каждый тик
//! - Obstacle avoidance/navmesh вне scope: headless navigator идёт по прямой

use bevy::prelude::*;

use super::movement::{Displacement, Mover};

/// Capability навигации, которую потребляет AI
pub trait Pathing {
    fn move_to(&mut self, point: Vec3);
    fn stop(&mut self);
    fn destination(&self) -> Option<Vec3>;
}

/// Команда движения агента
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
}

/// Straight-line navigator агента
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PathingAgent {
    pub command: MovementCommand,
    /// Скорость движения (m/s)
    pub speed: f32,
    /// Сколько раз цель была достигнута (монотонный счётчик для наблюдателей)
    pub arrivals: u32,
}

impl Default for PathingAgent {
    fn default() -> Self {
        Self {
            command: MovementCommand::Idle,
            speed: 3.5,
            arrivals: 0,
        }
    }
}

impl PathingAgent {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            ..default()
        }
    }

    /// Шаг к цели за dt (horizontal plane); Some(шаг, прибыли ли)
    pub fn step(&self, from: Vec3, delta: f32) -> Option<(Vec3, bool)> {
        let MovementCommand::MoveToPosition { target } = self.command else {
            return None;
        };

        let mut to_target = target - from;
        to_target.y = 0.0;

        let distance = to_target.length();
        let max_step = self.speed * delta;

        if distance <= max_step {
            Some((to_target, true))
        } else {
            Some((to_target / distance * max_step, false))
        }
    }
}

impl Pathing for PathingAgent {
    fn move_to(&mut self, point: Vec3) {
        self.command = MovementCommand::MoveToPosition { target: point };
    }

    fn stop(&mut self) {
        self.command = MovementCommand::Idle;
    }

    fn destination(&self) -> Option<Vec3> {
        match self.command {
            MovementCommand::MoveToPosition { target } => Some(target),
            MovementCommand::Idle => None,
        }
    }
}

/// Система: продвинуть агентов к их pathing цели
pub fn follow_pathing(
    mut query: Query<(&Transform, &mut PathingAgent, &mut Displacement)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (transform, mut agent, mut displacement) in query.iter_mut() {
        let Some((step, arrived)) = agent.step(transform.translation, delta) else {
            continue;
        };

        displacement.move_by(step);

        if arrived {
            agent.stop();
            agent.arrivals += 1;
        }
    }
}
