use std::io;

use thiserror::Error;

/// Errors raised while building or advancing a game session.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum GameError {
    #[error("no free cell left on the board for food")]
    BoardFull,
    #[error("grid {width}x{height} is too small, each side needs at least {min} cells")]
    GridTooSmall { width: u16, height: u16, min: u16 },
}

/// Errors raised by the persistent settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
