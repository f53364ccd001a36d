//! Library discovery
//!
//! Finds the playlist file and the songs folder in the remote store. The
//! expected layout is:
//!
//! ```text
//! <root_folder>/
//!     <playlist_file>      one track id per line
//!     <songs_folder>/      audio files
//! ```

use crate::error::{RMusicError, Result, SetupError};
use crate::playlist::Playlist;
use crate::traits::FileStore;
use crate::types::{FileKind, RemoteFile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Names of the folders and files the library is expected to contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryLayout {
    /// Root folder at the top of the store (default: `rMusic`)
    #[serde(default = "default_root_folder")]
    pub root_folder: String,

    /// Playlist file inside the root folder (default: `rSongList.csv`)
    #[serde(default = "default_playlist_file")]
    pub playlist_file: String,

    /// Audio folder inside the root folder (default: `Songs`)
    #[serde(default = "default_songs_folder")]
    pub songs_folder: String,
}

impl Default for LibraryLayout {
    fn default() -> Self {
        Self {
            root_folder: default_root_folder(),
            playlist_file: default_playlist_file(),
            songs_folder: default_songs_folder(),
        }
    }
}

fn default_root_folder() -> String {
    "rMusic".to_string()
}

fn default_playlist_file() -> String {
    "rSongList.csv".to_string()
}

fn default_songs_folder() -> String {
    "Songs".to_string()
}

/// Locate, download and parse the playlist file
///
/// Fails with a [`SetupError`] when the root folder or the playlist file is
/// missing, or the file lists no tracks.
pub async fn load_playlist(store: &dyn FileStore, layout: &LibraryLayout) -> Result<Playlist> {
    let root = find_folder(store, &layout.root_folder, None).await?;
    debug!(folder_id = %root.id, name = %root.name, "Found root folder");

    let file = store
        .find_by_name(&layout.playlist_file, Some(&root.id), FileKind::File)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SetupError::PlaylistFileNotFound {
            folder: layout.root_folder.clone(),
            name: layout.playlist_file.clone(),
        })?;
    debug!(file_id = %file.id, "Found playlist file");

    let bytes = store.fetch_bytes(&file.id).await?;
    let text = String::from_utf8_lossy(&bytes);
    let playlist = Playlist::parse(&text);

    if playlist.is_empty() {
        return Err(SetupError::EmptyPlaylist {
            name: layout.playlist_file.clone(),
        }
        .into());
    }

    info!(tracks = playlist.len(), "Loaded playlist");
    Ok(playlist)
}

/// List every audio file in the songs folder, following pagination
///
/// Entries are kept in listing order. Non-audio entries are skipped.
pub async fn scan_audio_files(
    store: &dyn FileStore,
    layout: &LibraryLayout,
) -> Result<Vec<RemoteFile>> {
    let root = find_folder(store, &layout.root_folder, None).await?;
    let songs = find_folder(store, &layout.songs_folder, Some(&root.id)).await?;
    debug!(folder_id = %songs.id, "Found songs folder");

    let mut files = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.list_children(&songs.id, page_token.as_deref()).await?;
        pages += 1;
        files.extend(page.files.into_iter().filter(RemoteFile::is_audio));
        debug!(pages, found = files.len(), "Scanned listing page");

        match page.next_page_token {
            Some(token) if !token.is_empty() => {
                if page_token.as_deref() == Some(token.as_str()) {
                    return Err(RMusicError::transport(
                        "listing returned the same continuation token twice",
                    ));
                }
                page_token = Some(token);
            }
            _ => break,
        }
    }

    if files.is_empty() {
        return Err(SetupError::NoAudioFiles {
            folder: format!("{}/{}", layout.root_folder, layout.songs_folder),
        }
        .into());
    }

    info!(files = files.len(), pages, "Scanned songs folder");
    Ok(files)
}

async fn find_folder(
    store: &dyn FileStore,
    name: &str,
    parent: Option<&str>,
) -> Result<RemoteFile> {
    store
        .find_by_name(name, parent, FileKind::Folder)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            SetupError::FolderNotFound {
                name: name.to_string(),
            }
            .into()
        })
}
