//! Playlist discovery: each immediate subdirectory of the music root is a
//! playlist, its track count the number of files directly inside it.
//! Read fresh on every search render; nothing is cached.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDir {
    pub name: String,
    pub path: PathBuf,
    pub track_count: usize,
}

/// List the playlist directories under `music_dir`, sorted by name.
/// Fails only when the root itself is unreadable; unreadable children
/// just count zero tracks.
pub fn scan_playlists(music_dir: &Path) -> Result<Vec<PlaylistDir>> {
    let mut playlists = Vec::new();
    let entries = std::fs::read_dir(music_dir)
        .with_context(|| format!("cannot read music directory {}", music_dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        playlists.push(PlaylistDir {
            track_count: count_tracks(&path),
            name,
            path,
        });
    }
    playlists.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(playlists)
}

fn count_tracks(dir: &Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}
