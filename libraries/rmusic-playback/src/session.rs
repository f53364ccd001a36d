//! Player session
//!
//! [`PlayerSession`] owns the sequencer, the prefetch coordinator, the load
//! pipeline and the resource tracker for one listening session. Everything
//! runs on the caller's task: the host forwards user commands and playback
//! notifications (progress, end of track, decode errors) and drains events
//! afterwards.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::metadata::MetadataResolver;
use crate::pipeline::LoadPipeline;
use crate::prefetch::PrefetchCoordinator;
use crate::resources::{ResourceHandle, ResourceTracker};
use crate::sequencer::{EndOfTrack, Sequencer};
use crate::sink::AudioSink;
use crate::types::{LoadedTrack, PlayMode, PlaybackConfig, PlayerSnapshot};
use bytes::Bytes;
use rmusic_core::{FileStore, Playlist, TagReader, TrackInfo};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// One listening session over a fixed playlist
///
/// Dropping the session releases every outstanding resource handle.
pub struct PlayerSession {
    sequencer: Sequencer,
    pipeline: LoadPipeline,
    prefetch: PrefetchCoordinator,
    tracker: ResourceTracker,
    sink: Box<dyn AudioSink>,
    config: PlaybackConfig,

    current: Option<LoadedTrack>,
    playing: bool,
    muted: bool,
    ended: bool,
    position: Duration,
    duration: Duration,

    pending_events: Vec<PlaybackEvent>,
    closed: bool,
}

impl PlayerSession {
    /// Create a session; no track is loaded until [`start`](Self::start)
    pub fn new(
        playlist: Playlist,
        store: Arc<dyn FileStore>,
        tag_reader: Arc<dyn TagReader>,
        sink: Box<dyn AudioSink>,
        config: PlaybackConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut sequencer = Sequencer::new(playlist, config.shuffle_seed)?;
        if config.start_shuffled {
            sequencer.shuffle_from_start();
        }
        sequencer.set_loop(config.start_looping);

        let resolver = MetadataResolver::new(tag_reader, Arc::clone(&store));
        let mut sink = sink;
        sink.set_muted(config.start_muted);

        info!(
            tracks = sequencer.len(),
            shuffled = config.start_shuffled,
            looping = config.start_looping,
            "Player session created"
        );

        Ok(Self {
            sequencer,
            pipeline: LoadPipeline::new(store, resolver),
            prefetch: PrefetchCoordinator::new(config.prefetch_threshold),
            tracker: ResourceTracker::new(),
            sink,
            muted: config.start_muted,
            config,
            current: None,
            playing: false,
            ended: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            pending_events: Vec::new(),
            closed: false,
        })
    }

    /// Load the first track without starting playback
    pub async fn start(&mut self) -> Result<()> {
        self.ensure_open()?;
        let first = self.sequencer.current_index();
        self.load_with_recovery(first, false, false, 0, None).await
    }

    // ===== Commands =====

    /// Toggle between playing and paused, returning the new playing flag
    pub async fn toggle_play(&mut self) -> Result<bool> {
        self.ensure_open()?;
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        if self.playing {
            self.sink.pause();
            self.set_playing(false);
            return Ok(false);
        }

        if self.ended {
            self.sink.seek(Duration::ZERO)?;
            self.position = Duration::ZERO;
            self.ended = false;
        }

        match self.sink.play().await {
            Ok(()) => {
                self.set_playing(true);
                Ok(true)
            }
            Err(err) => {
                self.emit_error(format!("Playback did not start: {}", err));
                Err(err)
            }
        }
    }

    /// Skip to the next track; `false` when there is none
    pub async fn next(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let Some(target) = self.sequencer.next() else {
            debug!("No next track");
            return Ok(false);
        };

        let resume = self.playing;
        self.load_with_recovery(target, false, resume, 0, None).await?;
        Ok(true)
    }

    /// Go back to the previous track; `false` when there is none
    pub async fn previous(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let Some(target) = self.sequencer.previous() else {
            debug!("No previous track");
            return Ok(false);
        };

        let resume = self.playing;
        self.load_with_recovery(target, false, resume, 0, None).await?;
        Ok(true)
    }

    /// Seek to a fraction of the current track's duration
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        self.ensure_open()?;
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if self.duration.is_zero() || !fraction.is_finite() {
            return Ok(());
        }

        let position = self.duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.sink.seek(position)?;
        self.position = position;
        self.emit_position();
        Ok(())
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.sink.set_muted(self.muted);
        self.pending_events
            .push(PlaybackEvent::MuteChanged { muted: self.muted });
        self.muted
    }

    pub fn toggle_loop(&mut self) -> bool {
        let looping = self.sequencer.toggle_loop();
        info!(looping, "Loop toggled");
        self.emit_mode();
        looping
    }

    /// Toggle shuffle; any prefetch for the old order is dropped
    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffled = self.sequencer.toggle_shuffle() == PlayMode::Shuffle;
        self.prefetch.invalidate(&mut self.tracker);
        self.emit_mode();
        shuffled
    }

    /// Install a specific shuffle permutation
    ///
    /// The current track stays current; prefetch state is dropped.
    pub fn set_shuffle_order(&mut self, order: Vec<usize>) -> Result<()> {
        self.sequencer.set_shuffle_order(order)?;
        self.prefetch.invalidate(&mut self.tracker);
        Ok(())
    }

    // ===== Host Notifications =====

    /// Playback position report from the audio engine
    ///
    /// Drives the prefetch trigger.
    pub async fn on_progress(&mut self, position: Duration, duration: Duration) -> Result<()> {
        self.ensure_open()?;
        self.position = position;
        self.duration = duration;
        self.emit_position();

        if self.current.is_none() || duration.is_zero() {
            return Ok(());
        }

        self.prefetch.settle(&mut self.tracker).await;

        let fraction = position.as_secs_f64() / duration.as_secs_f64();
        let next = self.sequencer.next().and_then(|index| {
            self.sequencer
                .track_id(index)
                .map(|track_id| (index, track_id.clone()))
        });
        let store = Arc::clone(self.pipeline.store());

        if let Some(target) = self.prefetch.on_progress(fraction, next, &store) {
            if let Some(track_id) = self.sequencer.track_id(target) {
                self.pending_events.push(PlaybackEvent::PrefetchStarted {
                    index: target,
                    track_id: track_id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The current track played to its end
    pub async fn on_track_ended(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        match self.sequencer.on_track_end() {
            EndOfTrack::Replay(index) => {
                debug!(index, "Replaying current track");
                self.sink.seek(Duration::ZERO)?;
                self.position = Duration::ZERO;
                self.start_output().await;
                Ok(())
            }
            EndOfTrack::Advance(index) => {
                self.load_with_recovery(index, true, true, 0, None).await
            }
            EndOfTrack::Stop => {
                self.sink.pause();
                self.ended = true;
                self.set_playing(false);
                self.pending_events.push(PlaybackEvent::PlaylistEnded);
                Ok(())
            }
        }
    }

    /// The audio engine could not decode or play the current track
    ///
    /// Treated like a failed load: playback moves on to the next index.
    pub async fn on_playback_error(&mut self, message: &str) -> Result<()> {
        self.ensure_open()?;
        let Some(current) = self.current.as_ref() else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        let failed = current.index;
        warn!(index = failed, track_id = %current.track_id, error = %message, "Playback failed");
        self.pending_events.push(PlaybackEvent::TrackSkipped {
            index: failed,
            track_id: current.track_id.to_string(),
            reason: message.to_string(),
        });
        self.pipeline.fail(&current.track_id, &mut self.pending_events);

        self.load_with_recovery(failed + 1, false, true, 1, Some(message.to_string()))
            .await
    }

    // ===== Loading =====

    /// Load `first`, stepping through following indices on failure
    ///
    /// Each index is tried at most once per run. `wait` lets the first
    /// attempt join an in-flight prefetch for exactly that index.
    async fn load_with_recovery(
        &mut self,
        first: usize,
        wait: bool,
        autoplay: bool,
        failed_before: usize,
        last_error: Option<String>,
    ) -> Result<()> {
        let mut failures = failed_before;
        let mut last_error = last_error;

        for target in first..self.sequencer.len() {
            if self
                .config
                .max_recovery_attempts
                .is_some_and(|max| failures >= max)
            {
                break;
            }

            match self.load_index(target, wait && target == first).await {
                Ok(()) => {
                    if autoplay {
                        self.start_output().await;
                    }
                    return Ok(());
                }
                Err(err) => {
                    failures += 1;
                    let track_id = self
                        .sequencer
                        .track_id(target)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    warn!(index = target, track_id = %track_id, error = %err, "Skipping track");
                    self.pending_events.push(PlaybackEvent::TrackSkipped {
                        index: target,
                        track_id,
                        reason: err.to_string(),
                    });
                    last_error = Some(err.to_string());
                }
            }
        }

        Err(self.nothing_playable(failures, last_error.unwrap_or_default()))
    }

    async fn load_index(&mut self, index: usize, wait: bool) -> Result<()> {
        let track_id = self
            .sequencer
            .track_id(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds {
                index,
                len: self.sequencer.len(),
            })?;
        self.sequencer.advance_to(index)?;

        let prefetched = self.prefetch.claim(index, wait, &mut self.tracker).await;
        self.prefetch.reset_trigger();

        let loaded = self
            .pipeline
            .load(
                index,
                &track_id,
                prefetched,
                &mut self.tracker,
                &mut self.pending_events,
            )
            .await?;

        let data = self.tracker.get(loaded.audio).unwrap_or_default();
        if let Err(err) = self.sink.load(loaded.audio, data).await {
            self.pipeline.fail(&track_id, &mut self.pending_events);
            for handle in loaded.handles() {
                self.tracker.release(handle);
            }
            return Err(err);
        }

        self.install(loaded);
        Ok(())
    }

    /// Make `loaded` current, releasing whatever it supersedes
    fn install(&mut self, loaded: LoadedTrack) {
        let previous = self.current.replace(loaded);
        let previous_track_id = previous.as_ref().map(|p| p.track_id.to_string());
        if let Some(previous) = previous {
            for handle in previous.handles() {
                self.tracker.release(handle);
            }
        }

        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.ended = false;

        if let Some(current) = self.current.as_ref() {
            info!(
                index = current.index,
                track_id = %current.track_id,
                title = %current.info.title,
                artist = %current.info.artist,
                "Track loaded"
            );
            self.pending_events.push(PlaybackEvent::TrackChanged {
                index: current.index,
                track_id: current.track_id.to_string(),
                previous_track_id,
                title: current.info.title.clone(),
                artist: current.info.artist.clone(),
                cover: current.cover,
            });
        }
    }

    fn nothing_playable(&mut self, attempts: usize, last_error: String) -> PlaybackError {
        if let Some(previous) = self.current.take() {
            for handle in previous.handles() {
                self.tracker.release(handle);
            }
        }
        self.prefetch.invalidate(&mut self.tracker);
        self.sink.pause();
        self.set_playing(false);

        let err = PlaybackError::NothingPlayable {
            attempts,
            last_error,
        };
        error!(error = %err, "No playable track left");
        self.emit_error(err.to_string());
        err
    }

    /// Ask the sink to play after an automatic transition
    ///
    /// A refusal leaves the session paused on the loaded track until the
    /// user presses play.
    async fn start_output(&mut self) {
        match self.sink.play().await {
            Ok(()) => self.set_playing(true),
            Err(err) => {
                warn!(error = %err, "Playback did not start, waiting for user");
                self.set_playing(false);
                self.emit_error(format!("Playback did not start: {}", err));
            }
        }
    }

    // ===== Teardown =====

    /// Release every outstanding resource; returns how many were released
    ///
    /// Idempotent. Every later command fails with [`PlaybackError::Closed`].
    pub fn close(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.closed = true;
        let before = self.tracker.released_total();

        self.prefetch.invalidate(&mut self.tracker);
        self.current = None;
        self.sink.pause();
        self.playing = false;
        self.tracker.release_all();

        let released = self.tracker.released_total() - before;
        info!(released, "Player session closed");
        released
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(PlaybackError::Closed)
        } else {
            Ok(())
        }
    }

    // ===== State =====

    /// Current presentation state
    pub fn snapshot(&self) -> PlayerSnapshot {
        let info = self
            .current
            .as_ref()
            .map(|c| c.info.clone())
            .unwrap_or_default();

        PlayerSnapshot {
            track_id: self.current.as_ref().map(|c| c.track_id.to_string()),
            index: self.current.as_ref().map(|c| c.index),
            title: info.title,
            artist: info.artist,
            cover: self.current.as_ref().and_then(|c| c.cover),
            position: self.position,
            duration: self.duration,
            playing: self.playing,
            looping: self.sequencer.is_looping(),
            shuffled: self.sequencer.mode() == PlayMode::Shuffle,
            muted: self.muted,
            phase: self.pipeline.phase(),
            ended: self.ended,
        }
    }

    pub fn current(&self) -> Option<&LoadedTrack> {
        self.current.as_ref()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    pub fn prefetch(&self) -> &PrefetchCoordinator {
        &self.prefetch
    }

    /// Bytes behind a handle (e.g. cover art for display)
    pub fn resource(&self, handle: ResourceHandle) -> Option<Bytes> {
        self.tracker.get(handle)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.pending_events
                .push(PlaybackEvent::StateChanged { playing });
        }
    }

    fn emit_mode(&mut self) {
        self.pending_events.push(PlaybackEvent::ModeChanged {
            looping: self.sequencer.is_looping(),
            shuffled: self.sequencer.mode() == PlayMode::Shuffle,
        });
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: self.position.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        });
    }

    fn emit_error(&mut self, message: String) {
        self.pending_events.push(PlaybackEvent::Error { message });
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.close();
    }
}
