//! rMusic Core
//!
//! Platform-agnostic core types, collaborator traits and error handling for rMusic.
//!
//! The player sources audio from a cloud file-storage account. Everything that
//! talks to the outside world is expressed as a trait here so the playback
//! engine can be driven by real clients or by test fakes:
//!
//! - **Domain Types**: `TrackId`, `Playlist`, `RemoteFile`, `TrackInfo`, `TagInfo`
//! - **Collaborator Traits**: `FileStore` (remote blob source), `TagReader` (tag parsing)
//! - **Library Discovery**: locating the playlist file and scanning the songs folder
//! - **Error Handling**: Unified `RMusicError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use rmusic_core::{Playlist, TrackInfo};
//!
//! let playlist = Playlist::parse("1abc\n\n2def\n");
//! assert_eq!(playlist.len(), 2);
//!
//! let info = TrackInfo::from_file_name(Some("Artist1 - SongX.mp3"));
//! assert_eq!(info.artist, "Artist1");
//! assert_eq!(info.title, "SongX");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod library;
pub mod playlist;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{RMusicError, Result, SetupError};
pub use library::{load_playlist, scan_audio_files, LibraryLayout};
pub use playlist::Playlist;
pub use traits::{FileStore, TagReader};
pub use types::{
    CoverArt, FileKind, FilePage, RemoteFile, TagInfo, TrackId, TrackInfo, UNKNOWN_ARTIST,
    UNKNOWN_TITLE,
};
