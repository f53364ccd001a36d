/// Core error types for rMusic
use thiserror::Error;

/// Result type alias using `RMusicError`
pub type Result<T> = std::result::Result<T, RMusicError>;

/// Core error type for rMusic
#[derive(Error, Debug)]
pub enum RMusicError {
    /// Library layout is missing something required to start a session
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// Fetching bytes or listings from the remote store failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Tag parsing failed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The playback engine could not start or decode a track
    #[error("Playback error: {0}")]
    Playback(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl RMusicError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error is local to a single track fetch
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotFound { .. } | Self::Io(_))
    }

    /// Whether the error is fatal to session start
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}

/// Errors that prevent a listening session from starting.
///
/// These are surfaced verbatim together with [`SetupError::remediation`],
/// and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Root (or songs) folder does not exist
    #[error("Folder not found: {name}")]
    FolderNotFound { name: String },

    /// Playlist file is missing from the root folder
    #[error("Playlist file \"{name}\" not found in folder \"{folder}\"")]
    PlaylistFileNotFound { folder: String, name: String },

    /// Playlist file contains no track identifiers
    #[error("Playlist file \"{name}\" is empty")]
    EmptyPlaylist { name: String },

    /// Songs folder holds no audio files
    #[error("No audio files found in folder \"{folder}\"")]
    NoAudioFiles { folder: String },
}

impl SetupError {
    /// Step-by-step guidance for fixing the storage layout
    pub fn remediation(&self) -> String {
        match self {
            Self::FolderNotFound { name } => format!(
                "Create the required folder in your storage root:\n\
                 1. Open your cloud storage\n\
                 2. Create a new folder\n\
                 3. Name it exactly: {name}\n\
                 4. Try again"
            ),
            Self::PlaylistFileNotFound { folder, name } => format!(
                "Create \"{name}\" inside your \"{folder}\" folder:\n\
                 1. Put one audio file id per line\n\
                 2. Upload it as \"{name}\" into \"{folder}\"\n\
                 3. Try again\n\
                 Tip: `rmusic-cli generate` writes this file from your songs folder"
            ),
            Self::EmptyPlaylist { name } => format!(
                "Your \"{name}\" file has no entries:\n\
                 1. Open \"{name}\"\n\
                 2. Add one audio file id per line\n\
                 3. Save it and try again"
            ),
            Self::NoAudioFiles { folder } => format!(
                "Your \"{folder}\" folder has no supported audio files:\n\
                 1. Upload MP3, M4A, WAV or FLAC files into \"{folder}\"\n\
                 2. Make sure they are not in subfolders\n\
                 3. Try again"
            ),
        }
    }
}
