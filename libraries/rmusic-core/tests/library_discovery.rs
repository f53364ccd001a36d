//! Library discovery tests against an in-memory file store

use async_trait::async_trait;
use bytes::Bytes;
use rmusic_core::{
    load_playlist, scan_audio_files, FileKind, FilePage, FileStore, LibraryLayout, RMusicError,
    RemoteFile, Result, SetupError,
};
use std::collections::HashMap;
use std::sync::Mutex;

// ===== Test Helpers =====

#[derive(Default)]
struct MemoryStore {
    /// (parent, entry, is_folder)
    entries: Vec<(Option<String>, RemoteFile, bool)>,
    contents: HashMap<String, Bytes>,
    page_size: usize,
    list_calls: Mutex<Vec<Option<String>>>,
}

impl MemoryStore {
    fn folder(mut self, id: &str, name: &str, parent: Option<&str>) -> Self {
        self.entries.push((
            parent.map(str::to_string),
            RemoteFile {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: Some("application/vnd.google-apps.folder".to_string()),
            },
            true,
        ));
        self
    }

    fn file(mut self, id: &str, name: &str, parent: &str, mime: &str, body: &str) -> Self {
        self.entries.push((
            Some(parent.to_string()),
            RemoteFile {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: Some(mime.to_string()),
            },
            false,
        ));
        self.contents
            .insert(id.to_string(), Bytes::from(body.to_string()));
        self
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_by_name(
        &self,
        name: &str,
        parent: Option<&str>,
        kind: FileKind,
    ) -> Result<Vec<RemoteFile>> {
        Ok(self
            .entries
            .iter()
            .filter(|(p, entry, is_folder)| {
                entry.name == name
                    && (parent.is_none() || p.as_deref() == parent)
                    && (*is_folder == (kind == FileKind::Folder))
            })
            .map(|(_, entry, _)| entry.clone())
            .collect())
    }

    async fn list_children(&self, folder_id: &str, page_token: Option<&str>) -> Result<FilePage> {
        self.list_calls
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));

        let children: Vec<RemoteFile> = self
            .entries
            .iter()
            .filter(|(p, _, _)| p.as_deref() == Some(folder_id))
            .map(|(_, entry, _)| entry.clone())
            .collect();

        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(children.len());
        let next_page_token = (end < children.len()).then(|| end.to_string());

        Ok(FilePage {
            files: children[start..end].to_vec(),
            next_page_token,
        })
    }

    async fn fetch_bytes(&self, file_id: &str) -> Result<Bytes> {
        self.contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| RMusicError::not_found("file", file_id))
    }

    async fn file_name(&self, file_id: &str) -> Result<String> {
        self.entries
            .iter()
            .find(|(_, entry, _)| entry.id == file_id)
            .map(|(_, entry, _)| entry.name.clone())
            .ok_or_else(|| RMusicError::not_found("file", file_id))
    }
}

fn library() -> MemoryStore {
    MemoryStore {
        page_size: 2,
        ..Default::default()
    }
    .folder("root", "rMusic", None)
    .folder("songs", "Songs", Some("root"))
}

fn expect_setup(result: Result<impl std::fmt::Debug>) -> SetupError {
    match result {
        Err(RMusicError::Setup(err)) => err,
        other => panic!("Expected setup error, got {:?}", other),
    }
}

// ===== Playlist Loading =====

#[tokio::test]
async fn loads_playlist_in_file_order() {
    let store = library().file("list", "rSongList.csv", "root", "text/csv", "C\nA\n\nB\n");

    let playlist = load_playlist(&store, &LibraryLayout::default())
        .await
        .unwrap();

    let ids: Vec<&str> = playlist.track_ids().iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn missing_root_folder_is_setup_error() {
    let store = MemoryStore::default();
    let err = expect_setup(load_playlist(&store, &LibraryLayout::default()).await);
    assert_eq!(
        err,
        SetupError::FolderNotFound {
            name: "rMusic".to_string()
        }
    );
}

#[tokio::test]
async fn missing_playlist_file_is_setup_error() {
    let store = library();
    let err = expect_setup(load_playlist(&store, &LibraryLayout::default()).await);
    assert!(matches!(err, SetupError::PlaylistFileNotFound { .. }));
}

#[tokio::test]
async fn blank_playlist_file_is_setup_error() {
    let store = library().file("list", "rSongList.csv", "root", "text/csv", "\n  \n");
    let err = expect_setup(load_playlist(&store, &LibraryLayout::default()).await);
    assert!(matches!(err, SetupError::EmptyPlaylist { .. }));
}

#[tokio::test]
async fn custom_layout_names_are_used() {
    let store = MemoryStore::default()
        .folder("r", "Music", None)
        .file("l", "list.txt", "r", "text/plain", "X\n");
    let layout = LibraryLayout {
        root_folder: "Music".to_string(),
        playlist_file: "list.txt".to_string(),
        songs_folder: "Audio".to_string(),
    };

    let playlist = load_playlist(&store, &layout).await.unwrap();
    assert_eq!(playlist.len(), 1);
}

// ===== Songs Folder Scan =====

#[tokio::test]
async fn scan_follows_every_page_and_filters_non_audio() {
    let store = library()
        .file("1", "a.mp3", "songs", "audio/mpeg", "")
        .file("2", "cover.jpg", "songs", "image/jpeg", "")
        .file("3", "b.flac", "songs", "application/octet-stream", "")
        .file("4", "c - d.m4a", "songs", "audio/mp4", "")
        .file("5", "notes.txt", "songs", "text/plain", "");

    let files = scan_audio_files(&store, &LibraryLayout::default())
        .await
        .unwrap();

    let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4"]);

    let calls = store.list_calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![None, Some("2".to_string()), Some("4".to_string())]
    );
}

#[tokio::test]
async fn scan_without_songs_folder_is_setup_error() {
    let store = MemoryStore::default().folder("root", "rMusic", None);
    let err = expect_setup(scan_audio_files(&store, &LibraryLayout::default()).await);
    assert_eq!(
        err,
        SetupError::FolderNotFound {
            name: "Songs".to_string()
        }
    );
}

#[tokio::test]
async fn scan_of_folder_without_audio_is_setup_error() {
    let store = library().file("x", "readme.txt", "songs", "text/plain", "");
    let err = expect_setup(scan_audio_files(&store, &LibraryLayout::default()).await);
    assert!(matches!(err, SetupError::NoAudioFiles { .. }));
}
