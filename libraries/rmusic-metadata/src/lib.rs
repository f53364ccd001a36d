//! rMusic Metadata
//!
//! Tag reading for audio files that only exist in memory.
//!
//! Tracks are downloaded from the remote store as byte buffers, so the reader
//! probes the format from the bytes themselves instead of a path. Title,
//! artist and the front cover are extracted; everything else is ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! use rmusic_core::TagReader;
//! use rmusic_metadata::LoftyTagReader;
//! # async fn example(bytes: bytes::Bytes) -> rmusic_core::Result<()> {
//! let reader = LoftyTagReader::new();
//! let tags = reader.read_tags(bytes).await?;
//! println!("{:?} by {:?}", tags.title, tags.artist);
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::LoftyTagReader;
