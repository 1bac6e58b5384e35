use minesweeper_common::models::UnsupportedStatus;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Missing argument error: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid argument error: {0}")]
    InvalidArgument(String),
    #[error("Game not found: {0}")]
    NotFound(String),
    #[error("Stored game could not be processed: {0}")]
    Storage(String),
}

impl GameError {
    pub(crate) fn invalid(message: &str) -> Self {
        Self::InvalidArgument(message.to_string())
    }
}

impl From<UnsupportedStatus> for GameError {
    fn from(value: UnsupportedStatus) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
