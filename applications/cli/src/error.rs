/// CLI error types
use rmusic_core::{RMusicError, SetupError};
use rmusic_drive::DriveClientError;
use rmusic_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] RMusicError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Drive(#[from] DriveClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The library-layout problem behind this error, if any
    pub fn setup(&self) -> Option<&SetupError> {
        match self {
            Self::Core(RMusicError::Setup(setup))
            | Self::Playback(PlaybackError::Core(RMusicError::Setup(setup))) => Some(setup),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
