//! Speculative loading of the next track
//!
//! Once the current track passes the progress threshold, the coordinator
//! downloads the next track's bytes on a background task. The result is kept
//! keyed by its playlist index and only ever handed to a load for that same
//! index; anything else is released.

use crate::resources::{ResourceHandle, ResourceKind, ResourceTracker};
use bytes::Bytes;
use rmusic_core::{FileStore, TrackId};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct InFlight {
    target: usize,
    track_id: TrackId,
    task: JoinHandle<rmusic_core::Result<Bytes>>,
}

/// A completed prefetch waiting to be claimed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefetched {
    pub index: usize,
    pub track_id: TrackId,
    pub audio: ResourceHandle,
}

/// Holds at most one in-flight fetch and at most one stored result
pub struct PrefetchCoordinator {
    threshold: f64,
    triggered: bool,
    in_flight: Option<InFlight>,
    stored: Option<Prefetched>,
}

impl PrefetchCoordinator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            triggered: false,
            in_flight: None,
            stored: None,
        }
    }

    /// Target of the fetch currently running, if any
    pub fn in_flight_target(&self) -> Option<usize> {
        self.in_flight.as_ref().map(|f| f.target)
    }

    pub fn stored(&self) -> Option<&Prefetched> {
        self.stored.as_ref()
    }

    /// Re-arm the trigger for a newly current track
    pub fn reset_trigger(&mut self) {
        self.triggered = false;
    }

    /// Start a prefetch if the progress crossed the threshold
    ///
    /// Fires at most once per track, never while another fetch is running,
    /// and only when there is a next track. Returns the target index when a
    /// fetch was started.
    pub fn on_progress(
        &mut self,
        fraction: f64,
        next: Option<(usize, TrackId)>,
        store: &Arc<dyn FileStore>,
    ) -> Option<usize> {
        if self.triggered || fraction < self.threshold || self.in_flight.is_some() {
            return None;
        }
        let (target, track_id) = next?;

        if self.stored.as_ref().is_some_and(|p| p.index == target) {
            self.triggered = true;
            return None;
        }

        self.triggered = true;
        let store = Arc::clone(store);
        let id = track_id.clone();
        let task = tokio::spawn(async move { store.fetch_bytes(id.as_str()).await });

        info!(index = target, track_id = %track_id, "Prefetching next track");
        self.in_flight = Some(InFlight {
            target,
            track_id,
            task,
        });
        Some(target)
    }

    /// Collect a finished background fetch without waiting
    pub async fn settle(&mut self, tracker: &mut ResourceTracker) {
        if self.in_flight.as_ref().is_some_and(|f| f.task.is_finished()) {
            if let Some(flight) = self.in_flight.take() {
                self.complete(flight, tracker).await;
            }
        }
    }

    async fn complete(&mut self, flight: InFlight, tracker: &mut ResourceTracker) {
        match flight.task.await {
            Ok(Ok(bytes)) => {
                let audio = tracker.create(ResourceKind::Audio, bytes);
                if let Some(old) = self.stored.take() {
                    tracker.release(old.audio);
                }
                debug!(index = flight.target, handle = %audio, "Prefetch stored");
                self.stored = Some(Prefetched {
                    index: flight.target,
                    track_id: flight.track_id,
                    audio,
                });
            }
            Ok(Err(err)) => {
                warn!(
                    index = flight.target,
                    track_id = %flight.track_id,
                    error = %err,
                    "Prefetch failed, next load will fetch on demand"
                );
            }
            Err(err) => {
                warn!(index = flight.target, error = %err, "Prefetch task did not complete");
            }
        }
    }

    /// Hand over the prefetched audio for `index`, if there is one
    ///
    /// With `wait`, a fetch still running for exactly `index` is awaited;
    /// otherwise only finished work counts. Whatever does not match is
    /// released, and a fetch still running is detached so its result is
    /// never registered.
    pub async fn claim(
        &mut self,
        index: usize,
        wait: bool,
        tracker: &mut ResourceTracker,
    ) -> Option<ResourceHandle> {
        if wait && self.in_flight_target() == Some(index) {
            if let Some(flight) = self.in_flight.take() {
                debug!(index, "Waiting for in-flight prefetch");
                self.complete(flight, tracker).await;
            }
        } else {
            self.settle(tracker).await;
        }

        if let Some(flight) = self.in_flight.take() {
            debug!(target = flight.target, "Detaching in-flight prefetch");
        }

        match self.stored.take() {
            Some(prefetched) if prefetched.index == index => {
                info!(index, track_id = %prefetched.track_id, "Using prefetched track");
                Some(prefetched.audio)
            }
            Some(stale) => {
                warn!(
                    prefetched = stale.index,
                    requested = index,
                    "Discarding prefetch for a different track"
                );
                tracker.release(stale.audio);
                None
            }
            None => None,
        }
    }

    /// Drop all prefetch state because "next" changed meaning
    pub fn invalidate(&mut self, tracker: &mut ResourceTracker) {
        if let Some(flight) = self.in_flight.take() {
            debug!(target = flight.target, "Detaching in-flight prefetch");
        }
        if let Some(stored) = self.stored.take() {
            debug!(index = stored.index, "Releasing stored prefetch");
            tracker.release(stored.audio);
        }
        self.triggered = false;
    }
}
