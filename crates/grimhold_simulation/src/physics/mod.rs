//! Physics glue module
//!
//! Move-by-vector, ground detection, straight-line pathing, terrain (headless + Rapier пол).
//! Коллизии резолвит Rapier (KinematicCharacterController), здесь только тонкий слой.

pub mod movement;
pub mod pathing;
pub mod terrain;

// Re-export основных типов
pub use movement::{
    apply_displacement, detect_ground_headless, rapier_character_body, read_character_output,
    yaw_rotation, BodyBackend, Displacement, GroundState, Mover, MOTION_EPSILON,
};
pub use pathing::{follow_pathing, MovementCommand, Pathing, PathingAgent};
pub use terrain::{spawn_ground, GroundPatch, HeadlessTerrain};
