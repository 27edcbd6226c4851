//! World queries — overlap sphere и ground check
//!
//! Контроллеры видят мир только через `WorldQueries` (read-only bool reads).
//! Две реализации:
//! - `RapierWorldQueries`: Rapier query pipeline (игра)
//! - `HeadlessWorldQueries`: distance test + `HeadlessTerrain` (тесты, headless сервер)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::physics::HeadlessTerrain;

/// Read-only world-geometry запросы
///
/// Должны быть безопасны для конкурентного чтения между независимыми агентами:
/// ни одна реализация не мутирует мир.
pub trait WorldQueries {
    /// Есть ли collider из `mask` внутри сферы (origin, radius)
    fn overlap_sphere(&self, origin: Vec3, radius: f32, mask: u32) -> bool;

    /// Короткий луч вниз из `point`: есть ли под ним пол из `mask`
    fn has_ground_below(&self, point: Vec3, mask: u32, max_distance: f32) -> bool;
}

/// Rapier-backed queries
pub struct RapierWorldQueries<'a> {
    context: &'a RapierContext<'a>,
}

impl<'a> RapierWorldQueries<'a> {
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self { context }
    }

    fn filter(mask: u32) -> QueryFilter<'static> {
        QueryFilter::default()
            .groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask)))
            .exclude_sensors()
    }
}

impl WorldQueries for RapierWorldQueries<'_> {
    fn overlap_sphere(&self, origin: Vec3, radius: f32, mask: u32) -> bool {
        let shape = Collider::ball(radius);
        let mut found = false;

        self.context.intersect_shape(
            origin,
            Quat::IDENTITY,
            &*shape.raw,
            Self::filter(mask),
            |_entity| {
                found = true;
                false // Первого hit достаточно
            },
        );

        found
    }

    fn has_ground_below(&self, point: Vec3, mask: u32, max_distance: f32) -> bool {
        self.context
            .cast_ray(point, Vec3::NEG_Y, max_distance, true, Self::filter(mask))
            .is_some()
    }
}

/// Headless queries: тела как точки + terrain heightmap из патчей
pub struct HeadlessWorldQueries<'a> {
    /// (позиция, membership биты)
    bodies: Vec<(Vec3, u32)>,
    terrain: &'a HeadlessTerrain,
}

impl<'a> HeadlessWorldQueries<'a> {
    pub fn new(bodies: impl IntoIterator<Item = (Vec3, u32)>, terrain: &'a HeadlessTerrain) -> Self {
        Self {
            bodies: bodies.into_iter().collect(),
            terrain,
        }
    }
}

impl WorldQueries for HeadlessWorldQueries<'_> {
    fn overlap_sphere(&self, origin: Vec3, radius: f32, mask: u32) -> bool {
        let radius_sq = radius * radius;

        self.bodies
            .iter()
            .any(|(position, layers)| layers & mask != 0 && position.distance_squared(origin) <= radius_sq)
    }

    fn has_ground_below(&self, point: Vec3, mask: u32, max_distance: f32) -> bool {
        if mask & self.terrain.layers == 0 {
            return false;
        }

        match self.terrain.height_at(point.x, point.z) {
            // Пол должен быть ниже точки, но не дальше длины луча
            Some(height) => height <= point.y && point.y - height <= max_distance,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::GroundPatch;
    use crate::shared::collision::{LAYER_AGENT, LAYER_GROUND, LAYER_PLAYER};

    #[test]
    fn test_headless_overlap_respects_radius() {
        let terrain = HeadlessTerrain::flat(0.0);
        let queries = HeadlessWorldQueries::new([(Vec3::new(5.0, 0.0, 0.0), LAYER_PLAYER)], &terrain);

        assert!(queries.overlap_sphere(Vec3::ZERO, 10.0, LAYER_PLAYER));
        assert!(!queries.overlap_sphere(Vec3::ZERO, 2.0, LAYER_PLAYER));
    }

    #[test]
    fn test_headless_overlap_respects_mask() {
        let terrain = HeadlessTerrain::flat(0.0);
        let queries = HeadlessWorldQueries::new([(Vec3::new(1.0, 0.0, 0.0), LAYER_AGENT)], &terrain);

        assert!(!queries.overlap_sphere(Vec3::ZERO, 10.0, LAYER_PLAYER));
        assert!(queries.overlap_sphere(Vec3::ZERO, 10.0, LAYER_AGENT));
    }

    #[test]
    fn test_headless_ground_check() {
        let terrain = HeadlessTerrain {
            patches: vec![GroundPatch::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0), 0.0)],
            layers: LAYER_GROUND,
        };
        let queries = HeadlessWorldQueries::new([], &terrain);

        // Над полом в пределах луча
        assert!(queries.has_ground_below(Vec3::new(0.0, 1.0, 0.0), LAYER_GROUND, 2.0));
        // Вне патча — пустота
        assert!(!queries.has_ground_below(Vec3::new(20.0, 1.0, 0.0), LAYER_GROUND, 2.0));
        // Слишком высоко для короткого луча
        assert!(!queries.has_ground_below(Vec3::new(0.0, 3.0, 0.0), LAYER_GROUND, 2.0));
        // Чужая маска
        assert!(!queries.has_ground_below(Vec3::new(0.0, 1.0, 0.0), LAYER_PLAYER, 2.0));
    }
}
