//! Core types for playback management

use crate::error::{PlaybackError, Result};
use crate::resources::ResourceHandle;
use rmusic_core::{TrackId, TrackInfo};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Traversal order of the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayMode {
    /// Source order
    #[default]
    Linear,

    /// Random permutation, regenerated when exhausted
    Shuffle,
}

/// Where the track load pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoadPhase {
    /// Nothing requested yet
    #[default]
    Idle,

    /// Downloading audio bytes
    Fetching,

    /// Reading tags / filename fallback
    MetadataResolving,

    /// Track is loaded and handed to the audio sink
    Ready,

    /// Fetch or hand-off failed
    Failed,
}

/// A track that has been fetched and resolved
///
/// Owns its handles: whoever holds the `LoadedTrack` must hand them back to
/// the [`ResourceTracker`](crate::ResourceTracker) when it is superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTrack {
    /// Playlist index
    pub index: usize,

    pub track_id: TrackId,

    /// Playable audio bytes
    pub audio: ResourceHandle,

    /// Cover image, when the tags carried one
    pub cover: Option<ResourceHandle>,

    /// Resolved title and artist
    pub info: TrackInfo,
}

impl LoadedTrack {
    /// Every handle this track owns
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> {
        std::iter::once(self.audio).chain(self.cover)
    }
}

/// Everything the presentation layer needs to render the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub track_id: Option<String>,
    pub index: Option<usize>,
    pub title: String,
    pub artist: String,
    pub cover: Option<ResourceHandle>,
    pub position: Duration,
    pub duration: Duration,
    pub playing: bool,
    pub looping: bool,
    pub shuffled: bool,
    pub muted: bool,
    pub phase: LoadPhase,

    /// Linear playback ran off the end of the playlist
    pub ended: bool,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Fraction of the current track after which the next one is prefetched
    /// (default: 0.8)
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: f64,

    /// Start in shuffle mode (default: false)
    #[serde(default)]
    pub start_shuffled: bool,

    /// Start with loop-current enabled (default: false)
    #[serde(default)]
    pub start_looping: bool,

    /// Start muted (default: false)
    #[serde(default)]
    pub start_muted: bool,

    /// Cap on consecutive failed tracks skipped during one recovery run
    /// (default: unlimited, i.e. until the end of the playlist)
    #[serde(default)]
    pub max_recovery_attempts: Option<usize>,

    /// Seed for the shuffle generator; random when unset
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_prefetch_threshold() -> f64 {
    0.8
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            prefetch_threshold: default_prefetch_threshold(),
            start_shuffled: false,
            start_looping: false,
            start_muted: false,
            max_recovery_attempts: None,
            shuffle_seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.prefetch_threshold > 0.0 && self.prefetch_threshold <= 1.0) {
            return Err(PlaybackError::InvalidConfig(format!(
                "prefetch_threshold must be in (0, 1], got {}",
                self.prefetch_threshold
            )));
        }
        if self.max_recovery_attempts == Some(0) {
            return Err(PlaybackError::InvalidConfig(
                "max_recovery_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
