/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Format could not be detected from the bytes
    #[error("Unable to detect audio format: {0}")]
    Probe(#[from] std::io::Error),

    /// File parsed but carries no tag at all
    #[error("No tags found")]
    NoTags,

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),

    /// Blocking read task panicked or was cancelled
    #[error("Tag reading task failed: {0}")]
    Join(String),
}

impl From<MetadataError> for rmusic_core::RMusicError {
    fn from(err: MetadataError) -> Self {
        rmusic_core::RMusicError::metadata(err.to_string())
    }
}
