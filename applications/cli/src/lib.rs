//! rMusic CLI Library
//!
//! Headless tools around a cloud-stored music library: playlist generation,
//! metadata export and a playlist walk-through.
//!
//! This library exposes the command implementations for testing purposes.

pub mod check;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;

use rmusic_drive::{DriveClient, StaticCredential};
use std::sync::Arc;

// Re-export commonly used types for convenience
pub use check::{check_playlist, CheckReport, CheckedTrack, SkippedTrack};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use export::{export_library, ExportEntry, LibraryExport};
pub use generate::{generate_playlist, render_playlist};

/// Drive client authenticated with the configured access token
pub fn connect(config: &AppConfig) -> Result<DriveClient> {
    let credentials = Arc::new(StaticCredential::new(config.auth.access_token.trim()));
    Ok(DriveClient::new(config.drive.clone(), credentials)?)
}
