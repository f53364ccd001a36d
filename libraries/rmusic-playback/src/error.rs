//! Error types for playback management

use rmusic_core::RMusicError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playlist has no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Index out of bounds
    #[error("Index out of bounds: {index} (playlist has {len} tracks)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Supplied shuffle order is not a permutation of the playlist indices
    #[error("Invalid shuffle order: {0}")]
    InvalidShuffleOrder(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Every remaining track failed to load
    #[error("Nothing playable: {attempts} track(s) failed to load, last error: {last_error}")]
    NothingPlayable { attempts: usize, last_error: String },

    /// Audio output rejected a request
    #[error("Audio sink error: {0}")]
    Sink(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Session was closed
    #[error("Session is closed")]
    Closed,

    /// Collaborator error (store, tag reader)
    #[error(transparent)]
    Core(#[from] RMusicError),
}

impl PlaybackError {
    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }
}

impl From<PlaybackError> for RMusicError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Core(inner) => inner,
            other => RMusicError::playback(other.to_string()),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
