//! Terrain — пол для headless и Rapier тел
//!
//! Набор прямоугольных патчей (XZ) с фиксированной высотой.
//! Headless: ground detection и ground check читают `HeadlessTerrain`.
//! Rapier: тот же патч спавнится статичной плитой (`spawn_ground`).

use bevy::math::Rect;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::shared::collision::{ground_groups, layer_name, LAYER_GROUND};

/// Полу-толщина Rapier плиты пола (верх плиты = высота патча)
pub const GROUND_SLAB_HALF_THICKNESS: f32 = 0.1;

/// Полу-размер плиты для бесконечного патча
pub const GROUND_SLAB_HALF_EXTENT: f32 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPatch {
    /// XZ границы (None = бесконечная плоскость)
    pub bounds: Option<Rect>,
    pub height: f32,
}

impl GroundPatch {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            bounds: Some(Rect::from_corners(min, max)),
            height,
        }
    }

    pub fn infinite(height: f32) -> Self {
        Self { bounds: None, height }
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        match self.bounds {
            Some(rect) => rect.contains(Vec2::new(x, z)),
            None => true,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct HeadlessTerrain {
    pub patches: Vec<GroundPatch>,
    /// Membership биты пола (для ground check mask)
    pub layers: u32,
}

impl Default for HeadlessTerrain {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

impl HeadlessTerrain {
    pub fn flat(height: f32) -> Self {
        Self {
            patches: vec![GroundPatch::infinite(height)],
            layers: LAYER_GROUND,
        }
    }

    /// Высота самого высокого патча под точкой
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.patches
            .iter()
            .filter(|patch| patch.covers(x, z))
            .map(|patch| patch.height)
            .reduce(f32::max)
    }
}

/// Spawn helper: статичный Rapier пол из патча
///
/// Верхняя грань плиты на `patch.height`. Бесконечный патч
/// становится плитой ±GROUND_SLAB_HALF_EXTENT вокруг начала координат.
pub fn spawn_ground(commands: &mut Commands, patch: GroundPatch) -> Entity {
    let (center, half_size) = match patch.bounds {
        Some(rect) => (rect.center(), rect.half_size()),
        None => (Vec2::ZERO, Vec2::splat(GROUND_SLAB_HALF_EXTENT)),
    };

    let entity = commands
        .spawn((
            Transform::from_xyz(center.x, patch.height - GROUND_SLAB_HALF_THICKNESS, center.y),
            RigidBody::Fixed,
            Collider::cuboid(half_size.x, GROUND_SLAB_HALF_THICKNESS, half_size.y),
            ground_groups(),
        ))
        .id();

    crate::log(&format!(
        "Physics: {} slab {:?} at height {} ({:?})",
        layer_name(LAYER_GROUND),
        entity,
        patch.height,
        patch.bounds
    ));

    entity
}
