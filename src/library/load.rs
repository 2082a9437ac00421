use std::path::Path;
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::model::{Album, Library, Song};

/// Errors raised while loading a library description.
///
/// All of these are fatal at startup: no partial library is ever constructed.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read library file {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("library file is not a valid album list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid duration {value:?} for song {song:?} on album {album:?} (expected MM:SS)")]
    InvalidDuration {
        album: String,
        song: String,
        value: String,
    },
}

// Raw records mirroring the on-disk JSON shape. Validation into the model
// happens after deserialization, so a file either loads completely or not
// at all.
#[derive(Debug, Deserialize)]
struct SongRecord {
    name: String,
    duration: String,
}

#[derive(Debug, Deserialize)]
struct AlbumRecord {
    genre: String,
    artist: String,
    album: String,
    songs: Vec<SongRecord>,
}

/// Load and validate a library from a JSON file.
pub fn load_library(path: &Path) -> Result<Library, LibraryError> {
    let raw = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records: Vec<AlbumRecord> = serde_json::from_str(&raw)?;

    let mut albums = Vec::with_capacity(records.len());
    for record in records {
        let mut songs = Vec::with_capacity(record.songs.len());
        for song in record.songs {
            let duration =
                parse_mmss(&song.duration).ok_or_else(|| LibraryError::InvalidDuration {
                    album: record.album.clone(),
                    song: song.name.clone(),
                    value: song.duration.clone(),
                })?;
            songs.push(Song {
                name: song.name,
                duration,
            });
        }
        albums.push(Album {
            genre: record.genre,
            artist: record.artist,
            title: record.album,
            songs,
        });
    }

    info!(path = %path.display(), albums = albums.len(), "library loaded");
    Ok(Library { albums })
}

/// Load a library from a remote source.
///
/// TODO: fetch from `url` once a network layer exists.
pub fn fetch_library(url: &str) -> Library {
    debug!(url, "remote library sources are not implemented yet");
    Library::default()
}

/// Parse a `"MM:SS"` duration string. Seconds must stay below 60; minutes
/// may use any number of digits.
pub(super) fn parse_mmss(value: &str) -> Option<Duration> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(Duration::from_secs(minutes * 60 + seconds))
}
