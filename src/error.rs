use std::path::PathBuf;

use crate::game::MoveError;

/// Errors raised by move selection and session play.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no available moves: the board is full or the game is decided")]
    NoAvailableMoves,

    #[error("no game is in progress")]
    GameNotInProgress,

    #[error("a game is already in progress")]
    GameInProgress,

    #[error("illegal move: {0}")]
    Move(#[from] MoveError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
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
