//! Config module - per-game configuration and construction errors

use std::fmt;

use crate::types::{
    GameMode, DEFAULT_COLUMN_COUNT, DEFAULT_ROW_COUNT, GARBAGE_TIMEOUT_MS, MAX_BOARD_DIMENSION,
    MIN_BOARD_DIMENSION, NEXT_QUEUE_LENGTH,
};

/// Malformed configuration, reported when a game or session is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDimensions { rows: usize, columns: usize },
    EmptyNextQueue,
    EmptyPool,
    ParticipantCount {
        mode: GameMode,
        humans: usize,
        ai: usize,
    },
    NoOpponents,
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        match self {
            ConfigError::InvalidDimensions { .. } => "invalid_dimensions",
            ConfigError::EmptyNextQueue => "empty_next_queue",
            ConfigError::EmptyPool => "empty_pool",
            ConfigError::ParticipantCount { .. } => "participant_count",
            ConfigError::NoOpponents => "no_opponents",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { rows, columns } => write!(
                f,
                "board must be between {min}x{min} and {max}x{max}, got {rows}x{columns}",
                min = MIN_BOARD_DIMENSION,
                max = MAX_BOARD_DIMENSION,
            ),
            ConfigError::EmptyNextQueue => write!(f, "next queue length must be at least 1"),
            ConfigError::EmptyPool => write!(f, "shape and effect pools must not be empty"),
            ConfigError::ParticipantCount { mode, humans, ai } => write!(
                f,
                "{} mode does not support {} human and {} AI player(s)",
                mode.as_str(),
                humans,
                ai
            ),
            ConfigError::NoOpponents => write!(f, "mode needs at least one AI opponent"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for one game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub row_count: usize,
    pub column_count: usize,
    pub game_mode: GameMode,
    /// Classic pieces only, no special effects and a steeper speed curve
    pub classic_mode: bool,
    pub next_queue_length: usize,
    pub garbage_timeout_ms: u64,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = MIN_BOARD_DIMENSION..=MAX_BOARD_DIMENSION;
        if !range.contains(&self.row_count) || !range.contains(&self.column_count) {
            return Err(ConfigError::InvalidDimensions {
                rows: self.row_count,
                columns: self.column_count,
            });
        }
        if self.next_queue_length == 0 {
            return Err(ConfigError::EmptyNextQueue);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            column_count: DEFAULT_COLUMN_COUNT,
            game_mode: GameMode::Solo,
            classic_mode: false,
            next_queue_length: NEXT_QUEUE_LENGTH,
            garbage_timeout_ms: GARBAGE_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let config = GameConfig {
            row_count: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimensions {
                rows: 0,
                columns: 10
            })
        );

        let config = GameConfig {
            column_count: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_queue() {
        let config = GameConfig {
            next_queue_length: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyNextQueue));
        assert_eq!(ConfigError::EmptyNextQueue.code(), "empty_next_queue");
    }
}
