//! Playlist generation from the songs folder

use crate::error::Result;
use rmusic_core::{scan_audio_files, FileStore, LibraryLayout, Playlist, TrackId};
use tracing::info;

/// Build a playlist listing every audio file in the songs folder, in
/// listing order
pub async fn generate_playlist(store: &dyn FileStore, layout: &LibraryLayout) -> Result<Playlist> {
    let files = scan_audio_files(store, layout).await?;
    let playlist: Playlist = files.into_iter().map(|file| TrackId::new(file.id)).collect();

    info!(tracks = playlist.len(), "Generated playlist");
    Ok(playlist)
}

/// Playlist file contents, newline-terminated
pub fn render_playlist(playlist: &Playlist) -> String {
    let mut text = playlist.to_text();
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
