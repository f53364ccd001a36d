//! Domain types shared by every rMusic crate

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title shown when neither tags nor the file name provide one
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Artist shown when neither tags nor the file name provide one
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Extensions accepted as audio when the store reports no audio mime type
const AUDIO_EXTENSIONS: [&str; 4] = [".mp3", ".m4a", ".wav", ".flac"];

/// Track identifier
///
/// Opaque key naming one audio file in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind filter for name lookups in the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Only folders
    Folder,
    /// Only regular files
    File,
}

/// A file or folder entry in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Store-assigned identifier
    pub id: String,

    /// Display name including extension
    pub name: String,

    /// Mime type reported by the store (if any)
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl RemoteFile {
    /// Whether the entry looks like a playable audio file
    pub fn is_audio(&self) -> bool {
        if self
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.contains("audio"))
        {
            return true;
        }

        let name = self.name.to_ascii_lowercase();
        AUDIO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}

/// One page of a folder listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePage {
    /// Entries on this page
    pub files: Vec<RemoteFile>,

    /// Continuation token for the next page (`None` on the last page)
    pub next_page_token: Option<String>,
}

/// Embedded cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    /// Image mime type, e.g. `image/jpeg`
    pub mime_type: Option<String>,

    /// Raw image bytes
    pub data: Bytes,
}

/// Fields read from an audio file's embedded tags
///
/// Every field is optional; a reader that finds a tag with no title still
/// returns `Ok`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover: Option<CoverArt>,
}

/// Display title and artist for a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
        }
    }
}

impl TrackInfo {
    /// Derive title and artist from a file name
    ///
    /// The extension is dropped, then the name is split on the first `" - "`:
    /// the left side is the artist, everything after it is the title. Without
    /// a separator the whole name is the title and the artist is unknown.
    pub fn from_file_name(file_name: Option<&str>) -> Self {
        let Some(name) = file_name.map(str::trim).filter(|name| !name.is_empty()) else {
            return Self::default();
        };

        let stem = strip_extension(name);

        match stem.split_once(" - ") {
            Some((artist, title)) => Self {
                title: non_blank_or(title, UNKNOWN_TITLE),
                artist: non_blank_or(artist, UNKNOWN_ARTIST),
            },
            None => Self {
                title: non_blank_or(stem, UNKNOWN_TITLE),
                artist: UNKNOWN_ARTIST.to_string(),
            },
        }
    }

    /// Overlay non-blank tag values on top of this info
    pub fn merge_tags(mut self, tags: &TagInfo) -> Self {
        if let Some(title) = tags.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            self.title = title.to_string();
        }
        if let Some(artist) = tags.artist.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            self.artist = artist.to_string();
        }
        self
    }

    /// Whether the tags alone provide both fields
    pub fn complete_from_tags(tags: &TagInfo) -> Option<Self> {
        let title = tags.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let artist = tags.artist.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
        Some(Self {
            title: title.to_string(),
            artist: artist.to_string(),
        })
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() && !name[dot + 1..].contains('/') => {
            &name[..dot]
        }
        _ => name,
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
