//! Playback engine: owns the playback state and the background timer task
//! that advances elapsed time for the current song.
//!
//! No audio is decoded; playback is simulated on a fixed one-second cadence.

mod clock;
mod engine;
mod state;

pub use clock::{Clock, SystemClock};
pub use engine::{NowPlayingScreen, Player};
pub use state::{PlaybackSnapshot, PlaybackStatus};
