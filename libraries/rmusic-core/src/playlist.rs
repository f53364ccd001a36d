//! Playlist source format
//!
//! A playlist is a newline-delimited plain-text list of track identifiers.
//! Order in the file is play order; blank lines are ignored.

use crate::types::TrackId;
use std::sync::Arc;

/// Ordered, immutable list of track identifiers for a session
///
/// Cloning is cheap; the identifier list is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    track_ids: Arc<[TrackId]>,
}

impl Playlist {
    /// Build a playlist from identifiers in play order
    pub fn new(track_ids: Vec<TrackId>) -> Self {
        Self {
            track_ids: track_ids.into(),
        }
    }

    /// Parse the newline-delimited playlist format
    ///
    /// Each line is trimmed (which also handles `\r\n` endings) and blank
    /// lines are dropped. A leading byte-order mark is ignored.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let ids = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(TrackId::from)
            .collect();
        Self::new(ids)
    }

    /// Serialize back to the playlist format, one id per line
    pub fn to_text(&self) -> String {
        self.track_ids
            .iter()
            .map(TrackId::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// Identifier at `index`
    pub fn get(&self, index: usize) -> Option<&TrackId> {
        self.track_ids.get(index)
    }

    /// All identifiers in play order
    pub fn track_ids(&self) -> &[TrackId] {
        &self.track_ids
    }
}

impl FromIterator<TrackId> for Playlist {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
