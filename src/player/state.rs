use std::fmt;
use std::time::Duration;

use crate::library::SongPos;

/// Derived playback status. Never stored; always computed from the
/// `playing`/`paused` flags so the two can't disagree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        };
        f.write_str(word)
    }
}

/// Mutable playback state, owned exclusively by the engine.
///
/// Invariants: `paused` implies `playing`; `current == None` implies
/// `!playing` and `elapsed == 0`.
#[derive(Debug, Clone, Default)]
pub(super) struct PlaybackState {
    pub playing: bool,
    pub paused: bool,
    pub visible: bool,
    pub current: Option<SongPos>,
    /// Derived each tick from `clock.now() - started_at`.
    pub elapsed: Duration,
    /// Clock reading when the current song started, shifted forward on
    /// resume so elapsed time stays continuous across pauses.
    pub started_at: Duration,
    /// Clock reading when the current pause began.
    pub pause_started: Duration,
}

impl PlaybackState {
    pub fn status(&self) -> PlaybackStatus {
        if !self.playing {
            PlaybackStatus::Stopped
        } else if self.paused {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        }
    }

    /// Back to the empty form used at session start and after `stop`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Consistent, lock-free view of playback for rendering and status reads.
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub current: Option<SongPos>,
    pub song: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub elapsed: Duration,
    pub total: Option<Duration>,
    pub visible: bool,
}
