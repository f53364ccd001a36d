//! Best-effort title/artist/cover resolution
//!
//! Tags win when present; the file name fills whatever the tags leave blank.
//! Resolution never fails: the worst case is "Unknown Title" by
//! "Unknown Artist".

use crate::resources::{ResourceHandle, ResourceKind, ResourceTracker};
use bytes::Bytes;
use rmusic_core::{FileStore, TagInfo, TagReader, TrackId, TrackInfo};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of metadata resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub info: TrackInfo,

    /// Cover image registered with the tracker
    pub cover: Option<ResourceHandle>,
}

/// Combines the tag reader with the file-name fallback
#[derive(Clone)]
pub struct MetadataResolver {
    reader: Arc<dyn TagReader>,
    store: Arc<dyn FileStore>,
}

impl MetadataResolver {
    pub fn new(reader: Arc<dyn TagReader>, store: Arc<dyn FileStore>) -> Self {
        Self { reader, store }
    }

    /// Resolve display metadata for a track
    ///
    /// The file name is only fetched when the tags do not already supply
    /// both title and artist.
    pub async fn resolve(
        &self,
        track_id: &TrackId,
        data: Bytes,
        tracker: &mut ResourceTracker,
    ) -> ResolvedMetadata {
        let tags = match self.reader.read_tags(data).await {
            Ok(tags) => tags,
            Err(err) => {
                warn!(track_id = %track_id, error = %err, "Tag reading failed, using file name");
                TagInfo::default()
            }
        };

        let info = match TrackInfo::complete_from_tags(&tags) {
            Some(info) => info,
            None => self.from_file_name(track_id).await.merge_tags(&tags),
        };

        let cover = tags
            .cover
            .map(|cover| tracker.create(ResourceKind::Image, cover.data));

        debug!(
            track_id = %track_id,
            title = %info.title,
            artist = %info.artist,
            has_cover = cover.is_some(),
            "Resolved metadata"
        );

        ResolvedMetadata { info, cover }
    }

    async fn from_file_name(&self, track_id: &TrackId) -> TrackInfo {
        match self.store.file_name(track_id.as_str()).await {
            Ok(name) => TrackInfo::from_file_name(Some(&name)),
            Err(err) => {
                warn!(track_id = %track_id, error = %err, "File name lookup failed");
                TrackInfo::from_file_name(None)
            }
        }
    }
}
