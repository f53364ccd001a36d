//! Playback Events
//!
//! Event-based communication for UI synchronization. The session queues
//! events as it goes; the host drains them with
//! [`PlayerSession::drain_events`](crate::PlayerSession::drain_events).

use crate::resources::ResourceHandle;
use crate::types::LoadPhase;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Load pipeline moved to a new phase for a track
    PhaseChanged {
        track_id: String,
        phase: LoadPhase,
    },

    /// A new track became current
    TrackChanged {
        /// Playlist index of the new track
        index: usize,
        track_id: String,
        previous_track_id: Option<String>,
        title: String,
        artist: String,
        cover: Option<ResourceHandle>,
    },

    /// Play/pause flag changed
    StateChanged {
        playing: bool,
    },

    /// Loop or shuffle flag changed
    ModeChanged {
        looping: bool,
        shuffled: bool,
    },

    /// Mute flag changed
    MuteChanged {
        muted: bool,
    },

    /// Position update from the host
    PositionUpdate {
        position_ms: u64,
        duration_ms: u64,
    },

    /// Next track's bytes started downloading ahead of time
    PrefetchStarted {
        index: usize,
        track_id: String,
    },

    /// A track failed to load and was skipped
    TrackSkipped {
        index: usize,
        track_id: String,
        reason: String,
    },

    /// Linear playback reached the end of the playlist
    PlaylistEnded,

    /// Error the user should see
    Error {
        message: String,
    },
}
