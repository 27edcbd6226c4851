//! Shared domain — примитивы обоих контроллеров
//!
//! - Cooldown таймеры (attack, roll, action gate)
//! - Collision layers
//! - WorldQueries (overlap / ground check capability)
//! - Animation signals (AnimationSink, AnimationParams)

pub mod animation;
pub mod collision;
pub mod cooldown;
pub mod queries;

pub use animation::{agent_params, player_params, AnimationParams, AnimationSink};
pub use cooldown::Cooldown;
pub use queries::{HeadlessWorldQueries, RapierWorldQueries, WorldQueries};
