//! Collision Layers Constants
//!
//! Centralised битовые маски для Rapier `CollisionGroups` и headless queries.
//!
//! ## Layers:
//! - `PLAYER` (0b1): игрок (sight/attack overlap ищет его)
//! - `AGENT` (0b10): hostile agents
//! - `GROUND` (0b100): пол/terrain (ground check для patrol точек)

use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Layer 1: игрок
pub const LAYER_PLAYER: u32 = 0b1;

/// Layer 2: hostile agents
pub const LAYER_AGENT: u32 = 0b10;

/// Layer 3: terrain / static geometry
pub const LAYER_GROUND: u32 = 0b100;

/// Mask: character bodies коллайдят с terrain и друг с другом
pub const MASK_CHARACTERS: u32 = LAYER_PLAYER | LAYER_AGENT | LAYER_GROUND;

/// Построить `CollisionGroups` из наших битов
pub fn groups(memberships: u32, filters: u32) -> CollisionGroups {
    CollisionGroups::new(
        Group::from_bits_truncate(memberships),
        Group::from_bits_truncate(filters),
    )
}

pub fn player_groups() -> CollisionGroups {
    groups(LAYER_PLAYER, MASK_CHARACTERS)
}

pub fn agent_groups() -> CollisionGroups {
    groups(LAYER_AGENT, MASK_CHARACTERS)
}

pub fn ground_groups() -> CollisionGroups {
    groups(LAYER_GROUND, LAYER_PLAYER | LAYER_AGENT)
}

/// Получить название слоя для debug логов
pub fn layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_PLAYER => "Player",
        LAYER_AGENT => "Agent",
        LAYER_GROUND => "Ground",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_disjoint() {
        assert_eq!(LAYER_PLAYER & LAYER_AGENT, 0);
        assert_eq!(LAYER_PLAYER & LAYER_GROUND, 0);
        assert_eq!(LAYER_AGENT & LAYER_GROUND, 0);
    }

    #[test]
    fn test_player_groups_bits() {
        let player = player_groups();
        assert_eq!(player.memberships.bits(), LAYER_PLAYER);
        assert_eq!(player.filters.bits(), MASK_CHARACTERS);
        assert_eq!(layer_name(LAYER_GROUND), "Ground");
    }
}
