/// A parsed user command. Selections carry the raw 1-based numbers; bounds
/// checks against the library happen in the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    Stop,
    Next,
    Previous,
    /// Switch to the Now Playing View.
    ShowPlayer,
    /// Return to the Library View.
    ShowLibrary,
    Select { album: usize, song: usize },
}

/// Reason a selection was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionError {
    Album,
    Song,
}

impl SelectionError {
    pub fn message(self) -> &'static str {
        match self {
            SelectionError::Album => "Invalid album number",
            SelectionError::Song => "Invalid song number",
        }
    }
}

/// Parse a Library View input line: a single-letter command
/// (case-insensitive) or an "album song" pair. `None` means the line is not
/// understood at all and the user should be told so.
pub fn parse_library_input(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" => Some(Command::Quit),
        "p" => Some(Command::TogglePause),
        "s" => Some(Command::Stop),
        "n" => Some(Command::Next),
        "r" => Some(Command::Previous),
        "v" => Some(Command::ShowPlayer),
        _ => {
            let mut parts = line.split_whitespace();
            let album: usize = parts.next()?.parse().ok()?;
            let song: usize = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            Some(Command::Select { album, song })
        }
    }
}

/// Parse a Now Playing View input line. The view labels `b` as "Back"
/// (previous song) and `l` returns to the library. Anything unrecognized
/// yields `None` and is ignored by the caller.
pub fn parse_player_input(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" => Some(Command::Quit),
        "p" => Some(Command::TogglePause),
        "s" => Some(Command::Stop),
        "n" => Some(Command::Next),
        "b" => Some(Command::Previous),
        "l" => Some(Command::ShowLibrary),
        _ => None,
    }
}
