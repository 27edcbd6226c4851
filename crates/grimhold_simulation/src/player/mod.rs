//! Player locomotion module
//!
//! Walk/run с поворотом к направлению, прыжок с blend гравитации,
//! перекат с фиксированным направлением и cooldown'ом.

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod input;
pub mod modes;
pub mod systems;

// Re-export основных типов
pub use components::{LocomotionConfig, Player, PlayerCamera};
pub use controller::{camera_relative, facing, LocomotionEnv, LocomotionOutcome, PlayerLocomotion};
pub use input::{LocomotionInput, PlayerInputEvent};
pub use modes::{select_activation, Activation, JumpArc, LocomotionMode, RollArc};
pub use systems::{spawn_camera, spawn_player};

use crate::SimulationSet;

/// Player Plugin
///
/// - collect_player_input (SimulationSet::Input)
/// - tick_player_locomotion (SimulationSet::Decide)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerInputEvent>();

        app.add_systems(
            FixedUpdate,
            (
                systems::collect_player_input.in_set(SimulationSet::Input),
                systems::tick_player_locomotion.in_set(SimulationSet::Decide),
            ),
        );
    }
}
