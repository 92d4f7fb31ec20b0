use std::path::PathBuf;

use crate::game::Side;

/// Errors raised when a move is rejected by [`GameState`](crate::game::GameState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square ({row}, {col}) is off a {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("it is not {}'s turn", .0.name())]
    NotYourTurn(Side),

    #[error("game is over ({} won)", .0.name())]
    GameOver(Side),

    #[error("square ({row}, {col}) is owned by {}", .owner.name())]
    Occupied { row: usize, col: usize, owner: Side },
}

/// Errors that can occur when building a board or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board size must be positive, got {0}")]
    InvalidSize(usize),

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
