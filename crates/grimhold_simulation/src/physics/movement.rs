//! Kinematic движение для агентов и игрока
//!
//! Архитектура:
//! - Контроллеры НЕ трогают Transform, они копят `Displacement.pending` (move by vector)
//! - `apply_displacement` применяет смещение один раз за тик:
//!   - Rapier: `KinematicCharacterController.translation` (коллизии резолвит Rapier)
//!   - Headless: прямая интеграция в Transform + clamp к `HeadlessTerrain`
//! - `Displacement.applied` = реальное смещение прошлого тика (motion signal для анимаций)
//!
//! Детерминизм: fixed timestep (60Hz)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::HeadlessTerrain;

/// Порог "стоим на месте" для motion signal (метры за тик)
pub const MOTION_EPSILON: f32 = 1.0e-4;

/// Допуск headless ground detection над полом (метры)
pub const GROUND_EPSILON: f32 = 0.05;

/// Capability: сдвинуть тело на вектор в этом тике
pub trait Mover {
    fn move_by(&mut self, delta: Vec3);
    fn rotate_to(&mut self, rotation: Quat);
}

/// Смещение тела за текущий тик
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Displacement {
    /// Накоплено контроллерами в этом тике (ещё не применено)
    pub pending: Vec3,
    /// Новый поворот тела (если контроллер его выставил)
    pub rotation: Option<Quat>,
    /// Фактически применённое смещение прошлого тика
    pub applied: Vec3,
}

impl Displacement {
    /// Двигалось ли тело по горизонтали в прошлом тике
    pub fn moved_horizontally(&self) -> bool {
        Vec2::new(self.applied.x, self.applied.z).length() > MOTION_EPSILON
    }
}

impl Mover for Displacement {
    fn move_by(&mut self, delta: Vec3) {
        self.pending += delta;
    }

    fn rotate_to(&mut self, rotation: Quat) {
        self.rotation = Some(rotation);
    }
}

/// Контакт с полом (обновляется в начале тика)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct GroundState {
    pub grounded: bool,
}

/// Поворот вокруг Y, при котором forward (-Z) смотрит вдоль `direction`
///
/// None если горизонтальная часть направления нулевая.
pub fn yaw_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= MOTION_EPSILON * MOTION_EPSILON {
        return None;
    }

    Some(Quat::from_rotation_y((-flat.x).atan2(-flat.z)))
}

/// Каким backend'ом двигать тело
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyBackend {
    /// Прямая интеграция в Transform (тесты, headless)
    #[default]
    Headless,
    /// Rapier KinematicCharacterController
    Rapier,
}

/// Система: ground detection по headless terrain
///
/// Grounded если ступни в пределах GROUND_EPSILON от пола.
/// Тела с Rapier контроллером пропускаем (у них grounded из output).
pub fn detect_ground_headless(
    mut query: Query<(&Transform, &mut GroundState), Without<KinematicCharacterController>>,
    terrain: Res<HeadlessTerrain>,
) {
    for (transform, mut ground) in query.iter_mut() {
        let position = transform.translation;
        ground.grounded = terrain
            .height_at(position.x, position.z)
            .is_some_and(|height| position.y <= height + GROUND_EPSILON);
    }
}

/// Система: забрать результат Rapier character controller'а
///
/// grounded + effective_translation прошлого physics step.
pub fn read_character_output(
    mut query: Query<(
        &KinematicCharacterControllerOutput,
        Option<&mut GroundState>,
        &mut Displacement,
    )>,
) {
    for (output, ground, mut displacement) in query.iter_mut() {
        if let Some(mut ground) = ground {
            ground.grounded = output.grounded;
        }
        displacement.applied = output.effective_translation;
    }
}

/// Система: применить накопленные смещения
///
/// Rapier тела получают desired translation (Rapier сам решит коллизии),
/// headless тела интегрируются напрямую и не проваливаются под terrain.
pub fn apply_displacement(
    mut query: Query<(
        &mut Displacement,
        &mut Transform,
        Option<&mut KinematicCharacterController>,
    )>,
    terrain: Res<HeadlessTerrain>,
) {
    for (mut displacement, mut transform, controller) in query.iter_mut() {
        if let Some(rotation) = displacement.rotation.take() {
            transform.rotation = rotation;
        }

        let delta = std::mem::take(&mut displacement.pending);

        match controller {
            Some(mut controller) => {
                controller.translation = Some(delta);
            }
            None => {
                let before = transform.translation;
                let mut after = before + delta;

                if let Some(height) = terrain.height_at(after.x, after.z) {
                    // Не проваливаемся под пол (но только если были над ним)
                    if after.y < height && before.y >= height - GROUND_EPSILON {
                        after.y = height;
                    }
                }

                transform.translation = after;
                displacement.applied = after - before;
            }
        }
    }
}

/// Rapier компоненты для character body (capsule + kinematic controller)
pub fn rapier_character_body(
    groups: CollisionGroups,
) -> (
    RigidBody,
    Collider,
    KinematicCharacterController,
    CollisionGroups,
) {
    (
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(0.5, 0.4), // Высота 1.8m (0.5 + 0.5 + 2×0.4), радиус 0.4m
        KinematicCharacterController {
            filter_groups: Some(groups),
            ..default()
        },
        groups,
    )
}
