/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use lofty::{Accessor, PictureType, Probe, Tag, TaggedFileExt};
use rmusic_core::{CoverArt, TagInfo, TagReader};
use std::io::Cursor;
use tracing::debug;

/// Tag reader using the lofty library
///
/// Parsing runs on the blocking pool so large files never stall the
/// session task.
pub struct LoftyTagReader;

impl LoftyTagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self
    }

    /// Read tags synchronously from in-memory bytes
    pub fn read_bytes(data: Bytes) -> Result<TagInfo> {
        let tagged_file = Probe::new(Cursor::new(data)).guess_file_type()?.read()?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or(MetadataError::NoTags)?;

        Ok(Self::extract_from_tag(tag))
    }

    /// Extract title, artist and cover from lofty tag
    fn extract_from_tag(tag: &Tag) -> TagInfo {
        let cover = tag
            .pictures()
            .iter()
            .find(|picture| picture.pic_type() == PictureType::CoverFront)
            .or_else(|| tag.pictures().first())
            .map(|picture| CoverArt {
                mime_type: picture.mime_type().map(|m| m.as_str().to_string()),
                data: Bytes::copy_from_slice(picture.data()),
            });

        TagInfo {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            cover,
        }
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagReader for LoftyTagReader {
    async fn read_tags(&self, data: Bytes) -> rmusic_core::Result<TagInfo> {
        let size = data.len();
        let tags = tokio::task::spawn_blocking(move || Self::read_bytes(data))
            .await
            .map_err(|e| MetadataError::Join(e.to_string()))??;

        debug!(
            size,
            has_title = tags.title.is_some(),
            has_artist = tags.artist.is_some(),
            has_cover = tags.cover.is_some(),
            "Read embedded tags"
        );

        Ok(tags)
    }
}
