//! Track load pipeline
//!
//! Idle → Fetching → MetadataResolving → Ready, or Failed once fetching has
//! begun. The pipeline itself never retries; recovery is the session's call.

use crate::events::PlaybackEvent;
use crate::metadata::MetadataResolver;
use crate::resources::{ResourceHandle, ResourceKind, ResourceTracker};
use crate::types::{LoadPhase, LoadedTrack};
use rmusic_core::{FileStore, RMusicError, TrackId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches, registers and resolves one track at a time
pub struct LoadPipeline {
    store: Arc<dyn FileStore>,
    resolver: MetadataResolver,
    phase: LoadPhase,
}

impl LoadPipeline {
    pub fn new(store: Arc<dyn FileStore>, resolver: MetadataResolver) -> Self {
        Self {
            store,
            resolver,
            phase: LoadPhase::Idle,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    fn transition(&mut self, track_id: &TrackId, phase: LoadPhase, events: &mut Vec<PlaybackEvent>) {
        debug!(track_id = %track_id, phase = ?phase, "Load phase");
        self.phase = phase;
        events.push(PlaybackEvent::PhaseChanged {
            track_id: track_id.to_string(),
            phase,
        });
    }

    /// Mark the current load as failed after it was handed off
    pub fn fail(&mut self, track_id: &TrackId, events: &mut Vec<PlaybackEvent>) {
        self.transition(track_id, LoadPhase::Failed, events);
    }

    /// Load `track_id` at `index`
    ///
    /// A `prefetched` audio handle that is still outstanding skips the fetch.
    /// On success the returned track owns its handles; on failure nothing is
    /// left registered.
    pub async fn load(
        &mut self,
        index: usize,
        track_id: &TrackId,
        prefetched: Option<ResourceHandle>,
        tracker: &mut ResourceTracker,
        events: &mut Vec<PlaybackEvent>,
    ) -> rmusic_core::Result<LoadedTrack> {
        let reused = prefetched.and_then(|handle| tracker.get(handle).map(|data| (handle, data)));

        let (audio, data) = match reused {
            Some(found) => found,
            None => {
                self.transition(track_id, LoadPhase::Fetching, events);
                match self.store.fetch_bytes(track_id.as_str()).await {
                    Ok(data) => (tracker.create(ResourceKind::Audio, data.clone()), data),
                    Err(err) => {
                        warn!(index, track_id = %track_id, error = %err, "Track fetch failed");
                        self.transition(track_id, LoadPhase::Failed, events);
                        return Err(err);
                    }
                }
            }
        };

        if data.is_empty() {
            tracker.release(audio);
            self.transition(track_id, LoadPhase::Failed, events);
            return Err(RMusicError::transport(format!(
                "file {} downloaded with no content",
                track_id
            )));
        }

        self.transition(track_id, LoadPhase::MetadataResolving, events);
        let metadata = self.resolver.resolve(track_id, data, tracker).await;

        self.transition(track_id, LoadPhase::Ready, events);
        Ok(LoadedTrack {
            index,
            track_id: track_id.clone(),
            audio,
            cover: metadata.cover,
            info: metadata.info,
        })
    }
}
