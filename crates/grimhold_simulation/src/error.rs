//! Ошибки инициализации симуляции
//!
//! Per-tick запросы (overlap, ground check) не падают — это bool reads.
//! Сюда попадают только фатальные проблемы wiring'а мира.

use bevy::prelude::*;
use thiserror::Error;

use crate::player::Player;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Hostile agent требует игрока в мире, а его нет
    #[error("player entity not found: hostile agents need a `Player` to resolve")]
    PlayerNotFound,

    /// Single-player симуляция: игрок должен быть ровно один
    #[error("expected exactly one `Player`, found {count}")]
    MultiplePlayers { count: usize },
}

/// Найти world position игрока
///
/// Вызывается AI системой каждый тик. Ошибка фатальна: система
/// пробрасывает её через `?` и Bevy error handler валит приложение.
pub fn resolve_player_position(
    players: &Query<&Transform, With<Player>>,
) -> Result<Vec3, SimulationError> {
    let mut iter = players.iter();

    let Some(transform) = iter.next() else {
        return Err(SimulationError::PlayerNotFound);
    };

    let extra = iter.count();
    if extra > 0 {
        return Err(SimulationError::MultiplePlayers { count: extra + 1 });
    }

    Ok(transform.translation)
}
