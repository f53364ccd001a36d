//! Library metadata export
//!
//! Every audio file in the songs folder is downloaded and run through the
//! same metadata resolution the player uses. Cover images are decoded along
//! the way but never written out; their handles are released per file.

use crate::error::Result;
use futures_util::stream::{self, StreamExt};
use rmusic_core::{scan_audio_files, FileStore, LibraryLayout, RemoteFile, TagReader, TrackId, TrackInfo};
use rmusic_playback::{MetadataResolver, ResourceTracker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One exported library entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub title: String,
    pub artist: String,
    pub file_id: String,
    pub file_name: String,
}

/// Result of a library export
#[derive(Debug, Clone, Default)]
pub struct LibraryExport {
    /// Entries in listing order
    pub entries: Vec<ExportEntry>,

    /// Files whose download failed and were described from their name only
    pub download_failures: usize,

    /// Cover-image handles created and released during the export
    pub released_handles: usize,
}

struct ExportedFile {
    entry: ExportEntry,
    downloaded: bool,
    released: usize,
}

/// Export metadata for every audio file, `concurrency` files at a time
pub async fn export_library(
    store: Arc<dyn FileStore>,
    reader: Arc<dyn TagReader>,
    layout: &LibraryLayout,
    concurrency: usize,
) -> Result<LibraryExport> {
    let files = scan_audio_files(store.as_ref(), layout).await?;
    info!(files = files.len(), concurrency, "Exporting library metadata");

    let resolver = MetadataResolver::new(reader, Arc::clone(&store));
    let store = store.as_ref();
    let resolver = &resolver;

    let exported: Vec<ExportedFile> = stream::iter(files)
        .map(|file| export_file(store, resolver, file))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut export = LibraryExport::default();
    for file in exported {
        if !file.downloaded {
            export.download_failures += 1;
        }
        export.released_handles += file.released;
        export.entries.push(file.entry);
    }

    info!(
        entries = export.entries.len(),
        download_failures = export.download_failures,
        "Library export finished"
    );
    Ok(export)
}

async fn export_file(
    store: &dyn FileStore,
    resolver: &MetadataResolver,
    file: RemoteFile,
) -> ExportedFile {
    let (info, downloaded, released) = match store.fetch_bytes(&file.id).await {
        Ok(bytes) => {
            let mut tracker = ResourceTracker::new();
            let resolved = resolver
                .resolve(&TrackId::new(file.id.as_str()), bytes, &mut tracker)
                .await;
            (resolved.info, true, tracker.release_all())
        }
        Err(err) => {
            warn!(file_id = %file.id, error = %err, "Download failed, using file name");
            (TrackInfo::from_file_name(Some(&file.name)), false, 0)
        }
    };

    debug!(file_id = %file.id, title = %info.title, "Exported file");

    ExportedFile {
        entry: ExportEntry {
            title: info.title,
            artist: info.artist,
            file_id: file.id,
            file_name: file.name,
        },
        downloaded,
        released,
    }
}
