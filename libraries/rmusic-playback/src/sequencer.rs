//! Playlist ordering
//!
//! The [`Sequencer`] owns the session's [`PlaylistState`] and decides which
//! index plays next. The track list itself never changes; shuffle only
//! permutes a parallel index array.

use crate::error::{PlaybackError, Result};
use crate::types::PlayMode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rmusic_core::{Playlist, TrackId};
use tracing::{debug, info};

/// Cursor state over an immutable playlist
#[derive(Debug, Clone)]
pub struct PlaylistState {
    playlist: Playlist,
    linear_position: usize,
    shuffle_order: Vec<usize>,
    shuffle_position: usize,
    mode: PlayMode,
    loop_current: bool,
}

impl PlaylistState {
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn linear_position(&self) -> usize {
        self.linear_position
    }

    pub fn shuffle_order(&self) -> &[usize] {
        &self.shuffle_order
    }

    pub fn shuffle_position(&self) -> usize {
        self.shuffle_position
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn loop_current(&self) -> bool {
        self.loop_current
    }
}

/// What happens when the current track finishes on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Loop is on: play the same index again
    Replay(usize),

    /// Cursor moved to this index
    Advance(usize),

    /// Linear playback ran off the end; nothing more plays until the user acts
    Stop,
}

/// Decides the playback order
#[derive(Debug)]
pub struct Sequencer {
    state: PlaylistState,
    rng: StdRng,
}

impl Sequencer {
    /// Create a sequencer positioned on the first track in linear mode
    ///
    /// With a `seed` the shuffle orders are reproducible.
    pub fn new(playlist: Playlist, seed: Option<u64>) -> Result<Self> {
        if playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let len = playlist.len();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            state: PlaylistState {
                playlist,
                linear_position: 0,
                shuffle_order: (0..len).collect(),
                shuffle_position: 0,
                mode: PlayMode::Linear,
                loop_current: false,
            },
            rng,
        })
    }

    pub fn state(&self) -> &PlaylistState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.playlist.is_empty()
    }

    pub fn mode(&self) -> PlayMode {
        self.state.mode
    }

    pub fn is_looping(&self) -> bool {
        self.state.loop_current
    }

    /// Index of the current track, read from the cursor the mode selects
    pub fn current_index(&self) -> usize {
        match self.state.mode {
            PlayMode::Linear => self.state.linear_position,
            PlayMode::Shuffle => self.state.shuffle_order[self.state.shuffle_position],
        }
    }

    /// Identifier of the current track
    pub fn current_track_id(&self) -> &TrackId {
        &self.state.playlist.track_ids()[self.current_index()]
    }

    pub fn track_id(&self, index: usize) -> Option<&TrackId> {
        self.state.playlist.get(index)
    }

    /// Index that follows the current one, without moving
    ///
    /// Never regenerates the shuffle order; that only happens on natural
    /// end-of-track.
    pub fn next(&self) -> Option<usize> {
        match self.state.mode {
            PlayMode::Linear => {
                let next = self.state.linear_position + 1;
                (next < self.len()).then_some(next)
            }
            PlayMode::Shuffle => self
                .state
                .shuffle_order
                .get(self.state.shuffle_position + 1)
                .copied(),
        }
    }

    /// Index before the current one, without moving
    pub fn previous(&self) -> Option<usize> {
        match self.state.mode {
            PlayMode::Linear => self.state.linear_position.checked_sub(1),
            PlayMode::Shuffle => self
                .state
                .shuffle_position
                .checked_sub(1)
                .map(|slot| self.state.shuffle_order[slot]),
        }
    }

    /// Move the cursor to `index`
    ///
    /// The linear position always follows; in shuffle mode the shuffle
    /// cursor jumps to the slot holding `index`.
    pub fn advance_to(&mut self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        self.commit(index);
        Ok(())
    }

    fn commit(&mut self, index: usize) {
        self.state.linear_position = index;
        if self.state.mode == PlayMode::Shuffle {
            self.state.shuffle_position = self.slot_of(index);
        }
    }

    fn slot_of(&self, index: usize) -> usize {
        self.state
            .shuffle_order
            .iter()
            .position(|&i| i == index)
            .unwrap_or(0)
    }

    /// Draw a fresh permutation, keeping the current track current
    pub fn regenerate_shuffle(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut self.rng);
        self.state.shuffle_order = order;
        self.state.shuffle_position = self.slot_of(self.state.linear_position);
        debug!(order = ?self.state.shuffle_order, "Generated shuffle order");
    }

    /// Replace the shuffle order with a caller-chosen permutation
    pub fn set_shuffle_order(&mut self, order: Vec<usize>) -> Result<()> {
        let len = self.len();
        if order.len() != len {
            return Err(PlaybackError::InvalidShuffleOrder(format!(
                "expected {} entries, got {}",
                len,
                order.len()
            )));
        }

        let mut seen = vec![false; len];
        for &index in &order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(PlaybackError::InvalidShuffleOrder(format!(
                        "index {} appears twice",
                        index
                    )))
                }
                None => return Err(PlaybackError::IndexOutOfBounds { index, len }),
            }
        }

        self.state.shuffle_order = order;
        self.state.shuffle_position = self.slot_of(self.state.linear_position);
        Ok(())
    }

    /// Turn shuffle on or off
    ///
    /// Turning it on regenerates the order immediately; turning it off keeps
    /// the linear position, which already tracks the current track.
    pub fn set_shuffle(&mut self, enabled: bool) {
        let mode = if enabled {
            PlayMode::Shuffle
        } else {
            PlayMode::Linear
        };
        if self.state.mode == mode {
            return;
        }

        self.state.mode = mode;
        if enabled {
            self.regenerate_shuffle();
        }
        info!(mode = ?mode, "Play mode changed");
    }

    pub fn toggle_shuffle(&mut self) -> PlayMode {
        self.set_shuffle(self.state.mode == PlayMode::Linear);
        self.state.mode
    }

    /// Enable shuffle and jump to the first slot of the new order
    pub fn shuffle_from_start(&mut self) {
        self.set_shuffle(true);
        let first = self.state.shuffle_order[0];
        self.commit(first);
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.state.loop_current = enabled;
    }

    pub fn toggle_loop(&mut self) -> bool {
        self.state.loop_current = !self.state.loop_current;
        self.state.loop_current
    }

    /// Apply the end-of-track policy and move the cursor accordingly
    pub fn on_track_end(&mut self) -> EndOfTrack {
        if self.state.loop_current {
            return EndOfTrack::Replay(self.current_index());
        }

        if let Some(next) = self.next() {
            self.commit(next);
            return EndOfTrack::Advance(next);
        }

        match self.state.mode {
            PlayMode::Shuffle => {
                info!("Shuffle order exhausted, starting a new one");
                self.regenerate_shuffle();
                self.state.shuffle_position = 0;
                let first = self.state.shuffle_order[0];
                self.state.linear_position = first;
                EndOfTrack::Advance(first)
            }
            PlayMode::Linear => {
                info!("Reached end of playlist");
                EndOfTrack::Stop
            }
        }
    }
}
