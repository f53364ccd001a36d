//! Playlist walk-through
//!
//! Plays the whole playlist through a [`PlayerSession`] with no audio
//! output, one natural end-of-track at a time, and reports what was loaded
//! and what failure recovery had to skip.

use crate::error::Result;
use rmusic_core::{FileStore, Playlist, TagReader};
use rmusic_playback::{NullSink, PlaybackConfig, PlaybackEvent, PlayerSession};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Nominal length reported for every track; only the fraction matters
const NOMINAL_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedTrack {
    pub index: usize,
    pub track_id: String,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTrack {
    pub index: usize,
    pub track_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Tracks that loaded, in play order
    pub played: Vec<CheckedTrack>,
    pub skipped: Vec<SkippedTrack>,
}

impl CheckReport {
    fn record(&mut self, events: Vec<PlaybackEvent>) {
        for event in events {
            match event {
                PlaybackEvent::TrackChanged {
                    index,
                    track_id,
                    title,
                    artist,
                    ..
                } => {
                    info!(index, track_id = %track_id, title = %title, artist = %artist, "Loaded");
                    self.played.push(CheckedTrack {
                        index,
                        track_id,
                        title,
                        artist,
                    });
                }
                PlaybackEvent::TrackSkipped {
                    index,
                    track_id,
                    reason,
                } => {
                    warn!(index, track_id = %track_id, reason = %reason, "Skipped");
                    self.skipped.push(SkippedTrack {
                        index,
                        track_id,
                        reason,
                    });
                }
                _ => {}
            }
        }
    }
}

/// Walk the playlist from the first track to the end in linear order
///
/// Fails with [`rmusic_playback::PlaybackError::NothingPlayable`] when
/// recovery runs out of tracks to try.
pub async fn check_playlist(
    playlist: Playlist,
    store: Arc<dyn FileStore>,
    reader: Arc<dyn TagReader>,
    config: PlaybackConfig,
) -> Result<CheckReport> {
    let config = PlaybackConfig {
        start_shuffled: false,
        start_looping: false,
        ..config
    };
    let mut session =
        PlayerSession::new(playlist, store, reader, Box::new(NullSink::new()), config)?;
    let mut report = CheckReport::default();

    let started = session.start().await;
    report.record(session.drain_events());
    started?;

    while !session.snapshot().ended {
        // Report the track as fully played so the next one is prefetched
        session
            .on_progress(NOMINAL_DURATION, NOMINAL_DURATION)
            .await?;

        let advanced = session.on_track_ended().await;
        report.record(session.drain_events());
        advanced?;
    }

    let released = session.close();
    info!(
        played = report.played.len(),
        skipped = report.skipped.len(),
        released,
        "Playlist check finished"
    );
    Ok(report)
}
