//! Audio output abstraction
//!
//! Platform-specific code (a browser element, a desktop decoder, a test
//! recorder) implements [`AudioSink`]. The session never decodes audio
//! itself; it hands the sink a handle plus the bytes behind it.

use crate::error::Result;
use crate::resources::ResourceHandle;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Audio output driven by the session
#[async_trait]
pub trait AudioSink: Send {
    /// Replace the current source
    async fn load(&mut self, audio: ResourceHandle, data: Bytes) -> Result<()>;

    /// Start or resume output
    ///
    /// May be rejected, e.g. when the platform blocks unattended playback.
    async fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> Result<()>;

    fn set_muted(&mut self, muted: bool);
}

/// Sink that accepts everything and outputs nothing
#[derive(Debug, Default)]
pub struct NullSink {
    loaded: Option<ResourceHandle>,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the last loaded source
    pub fn loaded(&self) -> Option<ResourceHandle> {
        self.loaded
    }
}

#[async_trait]
impl AudioSink for NullSink {
    async fn load(&mut self, audio: ResourceHandle, _data: Bytes) -> Result<()> {
        self.loaded = Some(audio);
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _position: Duration) -> Result<()> {
        Ok(())
    }

    fn set_muted(&mut self, _muted: bool) {}
}
