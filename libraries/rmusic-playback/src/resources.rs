//! Binary resource tracking
//!
//! Fetched audio and cover-image bytes are exposed to the host as opaque
//! [`ResourceHandle`]s. The [`ResourceTracker`] is the single owner of every
//! outstanding handle: each one is registered once and released once, no
//! matter whether the track it belongs to played, was superseded, or failed
//! half-way through loading.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// What a handle's bytes hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Encoded audio stream
    Audio,
    /// Cover image
    Image,
}

/// Reference to a transient in-memory byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    id: u64,
    kind: ResourceKind,
}

impl ResourceHandle {
    /// Mint a process-unique handle
    pub fn next(kind: ResourceKind) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ResourceKind::Audio => "audio",
            ResourceKind::Image => "image",
        };
        write!(f, "{}:{}", prefix, self.id)
    }
}

/// Owner of all outstanding resource handles
///
/// `register` is idempotent and `release` tolerates unknown or already
/// released handles, so overlapping cleanup paths never double-free.
#[derive(Debug, Default)]
pub struct ResourceTracker {
    outstanding: HashMap<ResourceHandle, Bytes>,
    registered_total: usize,
    released_total: usize,
}

impl ResourceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handle into the outstanding set
    ///
    /// Registering a handle that is already outstanding keeps the original
    /// bytes and does not count twice.
    pub fn register(&mut self, handle: ResourceHandle, data: Bytes) -> ResourceHandle {
        if self.outstanding.contains_key(&handle) {
            trace!(handle = %handle, "Handle already registered");
            return handle;
        }

        debug!(handle = %handle, size = data.len(), "Registered resource");
        self.outstanding.insert(handle, data);
        self.registered_total += 1;
        handle
    }

    /// Mint a new handle of `kind` and register `data` under it
    pub fn create(&mut self, kind: ResourceKind, data: Bytes) -> ResourceHandle {
        self.register(ResourceHandle::next(kind), data)
    }

    /// Release a handle
    ///
    /// Returns `true` if the handle was outstanding. Unknown handles are a
    /// no-op.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        match self.outstanding.remove(&handle) {
            Some(_) => {
                self.released_total += 1;
                debug!(handle = %handle, "Released resource");
                true
            }
            None => {
                trace!(handle = %handle, "Release of unknown handle ignored");
                false
            }
        }
    }

    /// Release every outstanding handle, returning how many were released
    pub fn release_all(&mut self) -> usize {
        let count = self.outstanding.len();
        self.outstanding.clear();
        self.released_total += count;
        if count > 0 {
            debug!(count, "Released all outstanding resources");
        }
        count
    }

    /// Bytes behind a handle, if it is still outstanding
    pub fn get(&self, handle: ResourceHandle) -> Option<Bytes> {
        self.outstanding.get(&handle).cloned()
    }

    pub fn is_outstanding(&self, handle: ResourceHandle) -> bool {
        self.outstanding.contains_key(&handle)
    }

    pub fn outstanding_count(&self) -> usize {
        self.outstanding.len()
    }

    /// Handles registered over the tracker's lifetime
    pub fn registered_total(&self) -> usize {
        self.registered_total
    }

    /// Handles released over the tracker's lifetime
    pub fn released_total(&self) -> usize {
        self.released_total
    }
}
