//! Shared fakes for playback integration tests
//!
//! Audio bytes are the UTF-8 string `audio:<id>`, which lets the fake tag
//! reader and sink recognise which track they were handed.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use rmusic_core::{
    FileKind, FilePage, FileStore, Playlist, RMusicError, RemoteFile, Result, TagInfo, TagReader,
    TrackId,
};
use rmusic_playback::{AudioSink, PlaybackConfig, PlaybackError, PlayerSession, ResourceHandle};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ===== File Store =====

#[derive(Default)]
pub struct FakeStore {
    names: HashMap<String, String>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub fetches: Mutex<Vec<String>>,
    pub name_lookups: Mutex<Vec<String>>,
}

impl FakeStore {
    /// Store holding `(id, file name)` pairs
    pub fn with_files(files: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            names: files
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
            ..Default::default()
        })
    }

    /// Every fetch of `id` fails with a transport error
    pub fn fail(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn heal(&self, id: &str) {
        self.failing.lock().unwrap().remove(id);
    }

    /// The next fetch of `id` blocks until the returned notify fires
    pub fn gate(&self, id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::clone(&notify));
        notify
    }

    pub fn fetch_count(&self, id: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.as_str() == id)
            .count()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

pub fn audio_bytes(id: &str) -> Bytes {
    Bytes::from(format!("audio:{}", id))
}

#[async_trait]
impl FileStore for FakeStore {
    async fn find_by_name(
        &self,
        _name: &str,
        _parent: Option<&str>,
        _kind: FileKind,
    ) -> Result<Vec<RemoteFile>> {
        Ok(Vec::new())
    }

    async fn list_children(&self, _folder_id: &str, _page_token: Option<&str>) -> Result<FilePage> {
        Ok(FilePage::default())
    }

    async fn fetch_bytes(&self, file_id: &str) -> Result<Bytes> {
        self.fetches.lock().unwrap().push(file_id.to_string());

        let gate = self.gates.lock().unwrap().remove(file_id);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(file_id) {
            return Err(RMusicError::transport(format!("connection reset fetching {}", file_id)));
        }
        if !self.names.contains_key(file_id) {
            return Err(RMusicError::not_found("file", file_id));
        }
        Ok(audio_bytes(file_id))
    }

    async fn file_name(&self, file_id: &str) -> Result<String> {
        self.name_lookups.lock().unwrap().push(file_id.to_string());
        self.names
            .get(file_id)
            .cloned()
            .ok_or_else(|| RMusicError::not_found("file", file_id))
    }
}

// ===== Tag Reader =====

/// Returns scripted tags per track id; unknown tracks fail to parse
#[derive(Default)]
pub struct FakeTagReader {
    tags: HashMap<String, TagInfo>,
}

impl FakeTagReader {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_tags(tags: Vec<(&str, TagInfo)>) -> Arc<Self> {
        Arc::new(Self {
            tags: tags
                .into_iter()
                .map(|(id, info)| (id.to_string(), info))
                .collect(),
        })
    }
}

#[async_trait]
impl TagReader for FakeTagReader {
    async fn read_tags(&self, data: Bytes) -> Result<TagInfo> {
        let text = String::from_utf8_lossy(&data);
        let id = text.strip_prefix("audio:").unwrap_or(&text);
        self.tags
            .get(id)
            .cloned()
            .ok_or_else(|| RMusicError::metadata("no tag header found"))
    }
}

// ===== Audio Sink =====

#[derive(Debug, Default)]
pub struct SinkLog {
    /// Track ids in the order they were loaded
    pub loaded: Vec<String>,
    pub handles: Vec<ResourceHandle>,
    pub plays: usize,
    pub pauses: usize,
    pub seeks: Vec<Duration>,
    pub muted: bool,
    pub reject_play: bool,
    pub reject_load: HashSet<String>,
}

pub struct RecordingSink {
    log: Arc<Mutex<SinkLog>>,
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn load(
        &mut self,
        audio: ResourceHandle,
        data: Bytes,
    ) -> std::result::Result<(), PlaybackError> {
        let text = String::from_utf8_lossy(&data);
        let id = text.strip_prefix("audio:").unwrap_or(&text).to_string();
        let mut log = self.log.lock().unwrap();
        if log.reject_load.contains(&id) {
            return Err(PlaybackError::sink(format!("cannot decode {}", id)));
        }
        log.loaded.push(id);
        log.handles.push(audio);
        Ok(())
    }

    async fn play(&mut self) -> std::result::Result<(), PlaybackError> {
        let mut log = self.log.lock().unwrap();
        if log.reject_play {
            return Err(PlaybackError::sink("play() rejected"));
        }
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().pauses += 1;
    }

    fn seek(&mut self, position: Duration) -> std::result::Result<(), PlaybackError> {
        self.log.lock().unwrap().seeks.push(position);
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.log.lock().unwrap().muted = muted;
    }
}

pub fn recording_sink() -> (Box<RecordingSink>, Arc<Mutex<SinkLog>>) {
    let log = Arc::new(Mutex::new(SinkLog::default()));
    (
        Box::new(RecordingSink {
            log: Arc::clone(&log),
        }),
        log,
    )
}

// ===== Session Helpers =====

pub fn playlist(ids: &[&str]) -> Playlist {
    ids.iter().map(|id| TrackId::new(*id)).collect()
}

/// Store where every id has the file name `<id>.mp3`
pub fn plain_store(ids: &[&str]) -> Arc<FakeStore> {
    let names: Vec<(String, String)> = ids
        .iter()
        .map(|id| (id.to_string(), format!("{}.mp3", id)))
        .collect();
    let pairs: Vec<(&str, &str)> = names
        .iter()
        .map(|(id, name)| (id.as_str(), name.as_str()))
        .collect();
    FakeStore::with_files(&pairs)
}

pub struct Harness {
    pub session: PlayerSession,
    pub store: Arc<FakeStore>,
    pub sink: Arc<Mutex<SinkLog>>,
}

pub fn harness(ids: &[&str], config: PlaybackConfig) -> Harness {
    harness_with(ids, plain_store(ids), FakeTagReader::failing(), config)
}

pub fn harness_with(
    ids: &[&str],
    store: Arc<FakeStore>,
    reader: Arc<FakeTagReader>,
    config: PlaybackConfig,
) -> Harness {
    let (sink, log) = recording_sink();
    let session = PlayerSession::new(playlist(ids), store.clone(), reader, sink, config)
        .expect("valid session");
    Harness {
        session,
        store,
        sink: log,
    }
}

pub fn seeded() -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(1234),
        ..Default::default()
    }
}

/// Report progress past the prefetch threshold
pub async fn play_past_threshold(session: &mut PlayerSession) {
    session
        .on_progress(Duration::from_secs(90), Duration::from_secs(100))
        .await
        .expect("progress accepted");
}
