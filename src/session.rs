//! Interactive session: reads user commands, dispatches to the playback
//! engine and renders state.
//!
//! Two display modes, chosen per iteration from an engine snapshot:
//!
//! - Library View (not playing, or panel hidden): prints the library table
//!   and a prompt, accepts an "album song" selection or a single-letter
//!   command. Bad input is reported and the loop continues.
//! - Now Playing View (playing and panel visible): the timer task owns the
//!   screen; this loop only reads the reduced command set, ignoring
//!   anything else.

mod command;

pub use command::{Command, SelectionError, parse_library_input, parse_player_input};

use std::io::{self, BufRead};
use std::sync::Arc;

use tracing::{debug, info};

use crate::library::{Library, SongPos};
use crate::player::{Player, PlaybackStatus};
use crate::ui::Console;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    library: Arc<Library>,
    player: Player,
    console: Arc<Console>,
}

impl Session {
    pub fn new(library: Arc<Library>, player: Player, console: Arc<Console>) -> Self {
        Self {
            library,
            player,
            console,
        }
    }

    /// Run the session loop until quit or end of input.
    ///
    /// Playback is stopped on every exit path; the engine's `Drop` covers
    /// unwinds on top of that.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let result = self.run_loop(&mut stdin.lock());
        self.player.stop();
        info!("session ended");
        result
    }

    fn run_loop(&mut self, input: &mut impl BufRead) -> io::Result<()> {
        loop {
            let snapshot = self.player.snapshot();
            let now_playing = snapshot.status != PlaybackStatus::Stopped && snapshot.visible;

            if !now_playing {
                self.console.show_library(&self.library)?;
                self.console.show_prompt()?;
            }

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // End of input counts as quit.
                return Ok(());
            }

            let flow = if now_playing {
                match parse_player_input(&line) {
                    Some(cmd) => self.dispatch(cmd),
                    // Unrecognized input is silently ignored here.
                    None => Flow::Continue,
                }
            } else {
                match parse_library_input(&line) {
                    Some(Command::Select { album, song }) => {
                        self.select(album, song)?;
                        Flow::Continue
                    }
                    Some(cmd) => self.dispatch(cmd),
                    None => {
                        self.console.message("Invalid input. Please try again.")?;
                        Flow::Continue
                    }
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Handle a 1-based "album song" selection from the Library View.
    fn select(&self, album: usize, song: usize) -> io::Result<()> {
        match resolve_selection(&self.library, album, song) {
            Ok(pos) => {
                debug!(album = pos.album, song = pos.song, "song selected");
                self.player.set_visible(true);
                self.player.play(pos);
            }
            Err(err) => self.console.message(err.message())?,
        }
        Ok(())
    }

    fn dispatch(&self, cmd: Command) -> Flow {
        debug!(?cmd, "command dispatched");
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::TogglePause => self.player.pause(),
            Command::Stop => self.player.stop(),
            Command::Next => self.player.next_song(),
            Command::Previous => self.player.previous_song(),
            Command::ShowPlayer => self.player.set_visible(true),
            Command::ShowLibrary => self.player.set_visible(false),
            // Selections are resolved before dispatch.
            Command::Select { .. } => {}
        }
        Flow::Continue
    }
}

/// Check a 1-based selection against the library and convert it to
/// zero-based coordinates.
pub fn resolve_selection(
    library: &Library,
    album: usize,
    song: usize,
) -> Result<SongPos, SelectionError> {
    if album == 0 || album > library.albums.len() {
        return Err(SelectionError::Album);
    }
    let songs = &library.albums[album - 1].songs;
    if song == 0 || song > songs.len() {
        return Err(SelectionError::Song);
    }
    Ok(SongPos::new(album - 1, song - 1))
}

#[cfg(test)]
mod tests;
