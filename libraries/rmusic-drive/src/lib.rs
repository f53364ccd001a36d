//! rMusic Drive Client
//!
//! HTTP client for the cloud drive that holds the music library.
//!
//! # Features
//!
//! - **Lookup**: find folders and files by exact name
//! - **Listing**: page through a folder's children with continuation tokens
//! - **Download**: fetch a file's raw bytes or its display name
//! - **Credentials**: bearer tokens from a pluggable provider, with one retry
//!   after the provider is told its token expired
//!
//! # Example
//!
//! ```ignore
//! use rmusic_drive::{DriveClient, DriveConfig, StaticCredential};
//! use rmusic_core::{load_playlist, LibraryLayout};
//! use std::sync::Arc;
//!
//! let credentials = Arc::new(StaticCredential::new("ya29.token"));
//! let client = DriveClient::new(DriveConfig::default(), credentials)?;
//!
//! let playlist = load_playlist(&client, &LibraryLayout::default()).await?;
//! println!("Loaded {} tracks", playlist.len());
//! ```

mod auth;
mod client;
mod error;
mod types;

// Re-export main types
pub use auth::{CredentialProvider, StaticCredential};
pub use client::DriveClient;
pub use error::{DriveClientError, Result};
pub use types::DriveConfig;
