//! Animation signals — контракт между behavior логикой и animation системой
//!
//! Имена параметров персистентны (их читают animator state machines),
//! поэтому живут константами и не меняются.

use bevy::prelude::*;
use std::collections::BTreeMap;

/// Параметры hostile agent
pub mod agent_params {
    pub const DIE: &str = "die";
    pub const IS_WALKING: &str = "isWalking";
    pub const IS_RUNNING: &str = "isRunning";
    pub const PUNCH: &str = "punch";
    pub const POUND: &str = "pound";
}

/// Параметры игрока
pub mod player_params {
    pub const IS_WALKING: &str = "IsWalking";
    pub const IS_RUNNING: &str = "IsRunning";
    pub const IS_IDLE: &str = "IsIdle";
    pub const IS_JUMPING: &str = "IsJumping";
    pub const IS_ROLLING: &str = "IsRolling";
}

/// Куда контроллер пишет animation сигналы
pub trait AnimationSink {
    fn set_bool(&mut self, name: &'static str, value: bool);
    fn set_trigger(&mut self, name: &'static str);
}

/// Текущие значения animator параметров entity
///
/// Bools — последнее записанное значение.
/// Triggers — one-shot очередь до `take_triggers()` (animation bridge забирает их).
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationParams {
    bools: BTreeMap<&'static str, bool>,
    triggers: Vec<&'static str>,
}

impl AnimationParams {
    /// Параметр не выставлялся → false (как дефолт animator'а)
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn pending_triggers(&self) -> &[&'static str] {
        &self.triggers
    }

    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.triggers)
    }
}

impl AnimationSink for AnimationParams {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }
}
