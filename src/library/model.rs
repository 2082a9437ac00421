use std::time::Duration;

/// A single song. Durations are parsed from `"MM:SS"` strings at load time,
/// so a constructed `Song` always carries a valid duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub name: String,
    pub duration: Duration,
}

/// An album. Song order is playback order within the album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub genre: String,
    pub artist: String,
    pub title: String,
    pub songs: Vec<Song>,
}

/// The full library. Album order defines where playback continues when an
/// album runs out of songs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub albums: Vec<Album>,
}

/// Coordinates of a song inside a [`Library`]: album index + song index.
///
/// Playback state stores these instead of references into the library, which
/// keeps ownership simple and makes "same song?" checks a plain equality.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SongPos {
    pub album: usize,
    pub song: usize,
}

impl SongPos {
    pub fn new(album: usize, song: usize) -> Self {
        Self { album, song }
    }
}

impl Library {
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn album(&self, index: usize) -> Option<&Album> {
        self.albums.get(index)
    }

    /// Resolve a position to its album and song, if both indices are valid.
    pub fn song_at(&self, pos: SongPos) -> Option<(&Album, &Song)> {
        let album = self.albums.get(pos.album)?;
        let song = album.songs.get(pos.song)?;
        Some((album, song))
    }

    /// The position playback continues at after `pos`: the next song on the
    /// same album, or the first song of the next non-empty album. `None` at
    /// the end of the library.
    pub fn next_position(&self, pos: SongPos) -> Option<SongPos> {
        let album = self.albums.get(pos.album)?;
        if pos.song + 1 < album.songs.len() {
            return Some(SongPos::new(pos.album, pos.song + 1));
        }
        self.albums
            .iter()
            .enumerate()
            .skip(pos.album + 1)
            .find(|(_, a)| !a.songs.is_empty())
            .map(|(i, _)| SongPos::new(i, 0))
    }

    /// Symmetric to [`next_position`](Self::next_position): the previous song
    /// on the same album, or the last song of the previous non-empty album.
    pub fn prev_position(&self, pos: SongPos) -> Option<SongPos> {
        if pos.song > 0 {
            return Some(SongPos::new(pos.album, pos.song - 1));
        }
        self.albums
            .iter()
            .enumerate()
            .take(pos.album)
            .rev()
            .find(|(_, a)| !a.songs.is_empty())
            .map(|(i, a)| SongPos::new(i, a.songs.len() - 1))
    }
}
