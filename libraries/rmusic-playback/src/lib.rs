//! rMusic - Playback Engine
//!
//! Decides what plays next, loads it, and keeps track of every byte buffer
//! handed to the host.
//!
//! This crate provides:
//! - Playlist sequencing (linear and shuffle, loop-current)
//! - Prefetching of the next track once the current one is far enough along
//! - A track load pipeline with filename fallback for metadata
//! - Exactly-once release of audio and cover-image handles
//! - Failure recovery that skips unplayable tracks
//!
//! # Architecture
//!
//! `rmusic-playback` never talks to the network or decodes audio itself.
//! The remote store and tag reader come from `rmusic-core` traits, and audio
//! output is an [`AudioSink`] supplied by the host. Everything runs on the
//! caller's task; the only background work is the prefetch download.
//!
//! # Example
//!
//! ```rust,no_run
//! use rmusic_playback::{NullSink, PlaybackConfig, PlayerSession};
//! # use rmusic_core::{FileStore, Playlist, TagReader};
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # async fn run(store: Arc<dyn FileStore>, tags: Arc<dyn TagReader>) -> rmusic_playback::Result<()> {
//!
//! let playlist = Playlist::parse("1abc\n2def\n3ghi\n");
//! let mut session = PlayerSession::new(
//!     playlist,
//!     store,
//!     tags,
//!     Box::new(NullSink::new()),
//!     PlaybackConfig::default(),
//! )?;
//!
//! session.start().await?;
//! session.toggle_play().await?;
//!
//! // Host reports progress; past 80% the next track is prefetched
//! session.on_progress(Duration::from_secs(170), Duration::from_secs(200)).await?;
//!
//! // Natural end of track
//! session.on_track_ended().await?;
//!
//! for event in session.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod metadata;
mod pipeline;
mod prefetch;
mod resources;
mod sequencer;
mod session;
mod sink;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use metadata::{MetadataResolver, ResolvedMetadata};
pub use pipeline::LoadPipeline;
pub use prefetch::{PrefetchCoordinator, Prefetched};
pub use resources::{ResourceHandle, ResourceKind, ResourceTracker};
pub use sequencer::{EndOfTrack, PlaylistState, Sequencer};
pub use session::PlayerSession;
pub use sink::{AudioSink, NullSink};
pub use types::{LoadPhase, LoadedTrack, PlayMode, PlaybackConfig, PlayerSnapshot};
