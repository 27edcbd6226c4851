//! Player input: event от host'а + latched intents до следующего тика

use bevy::prelude::*;

/// Player input event (генерируется host'ом на каждое изменение input'а)
///
/// # Fields
/// - `move_direction`: WASD (x: -1 left → +1 right, y: -1 forward (-Z) → +1 backward)
/// - `run`: level-triggered (держим Shift = бежим)
/// - `jump`: just_pressed
/// - `roll`: just_pressed
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct PlayerInputEvent {
    pub move_direction: Vec2,
    pub run: bool,
    pub jump: bool,
    pub roll: bool,
}

/// Текущий input игрока
///
/// move/run = последнее значение (держатся между событиями),
/// jump/roll = edge, копятся до ближайшего locomotion тика и сгорают в нём.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionInput {
    pub move_direction: Vec2,
    pub run: bool,
    pub jump_pressed: bool,
    pub roll_pressed: bool,
}

impl LocomotionInput {
    pub fn apply_event(&mut self, event: &PlayerInputEvent) {
        self.move_direction = event.move_direction;
        self.run = event.run;
        self.jump_pressed |= event.jump;
        self.roll_pressed |= event.roll;
    }

    /// Забрать edge intents (jump, roll) — после этого они сброшены
    pub fn take_presses(&mut self) -> (bool, bool) {
        let presses = (self.jump_pressed, self.roll_pressed);
        self.jump_pressed = false;
        self.roll_pressed = false;
        presses
    }
}
