/// Collaborator traits for rMusic
///
/// The playback engine only ever talks to the outside world through these.
use crate::error::Result;
use crate::types::{FileKind, FilePage, RemoteFile, TagInfo};
use async_trait::async_trait;
use bytes::Bytes;

/// Remote file store
///
/// A keyed blob source: folders can be looked up by name, listed page by
/// page, and files fetched by identifier. Implementations bound their own
/// transport timeouts; a failed request must return an error rather than
/// hang.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Find non-trashed entries with exactly this name
    ///
    /// When `parent` is given only its direct children are searched.
    async fn find_by_name(
        &self,
        name: &str,
        parent: Option<&str>,
        kind: FileKind,
    ) -> Result<Vec<RemoteFile>>;

    /// List one page of a folder's children
    ///
    /// Pass the previous page's `next_page_token` to continue.
    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<FilePage>;

    /// Download a file's raw bytes
    async fn fetch_bytes(&self, file_id: &str) -> Result<Bytes>;

    /// Get a file's display name
    async fn file_name(&self, file_id: &str) -> Result<String>;
}

/// Metadata tag reader
///
/// Given the raw bytes of an audio file, yields whatever title, artist and
/// cover image it can find. Failure is expected for untagged or unusual
/// files and is always recovered by the caller.
#[async_trait]
pub trait TagReader: Send + Sync {
    /// Read tags from in-memory audio bytes
    async fn read_tags(&self, data: Bytes) -> Result<TagInfo>;
}
