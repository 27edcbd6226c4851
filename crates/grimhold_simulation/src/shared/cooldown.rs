//! Cooldown таймер — countdown до повторной активации
//!
//! Владелец (agent/player controller) тикает его ровно один раз за тик.
//! Никакого глобального clock: только переданный dt.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Cooldown {
    /// Длительность после `start()` (секунды)
    pub duration: f32,
    /// Оставшееся время (0 = готов)
    pub remaining: f32,
}

impl Cooldown {
    /// Новый таймер, сразу готовый к активации
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Запустить cooldown (сбросить на полную длительность)
    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(1.0)
    }
}
