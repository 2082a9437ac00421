use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::config::UiSettings;
use crate::library::{Album, Song};
use crate::player::SystemClock;

fn song(name: &str, secs: u64) -> Song {
    Song {
        name: name.into(),
        duration: Duration::from_secs(secs),
    }
}

fn album(title: &str, songs: Vec<Song>) -> Album {
    Album {
        genre: "Rock".into(),
        artist: "Artist".into(),
        title: title.into(),
        songs,
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn sample_library() -> Arc<Library> {
    Arc::new(Library {
        albums: vec![
            album("First", vec![song("A", 120), song("B", 95)]),
            album("Second", vec![song("C", 60)]),
        ],
    })
}

fn session() -> (Session, SharedBuf) {
    let library = sample_library();
    let buf = SharedBuf::default();
    let ui = UiSettings {
        clear_screen: false,
        ..UiSettings::default()
    };
    let console = Arc::new(Console::with_writer(&ui, Box::new(buf.clone())));
    let player = Player::new(
        Arc::clone(&library),
        Arc::new(SystemClock::new()),
        Arc::clone(&console) as Arc<dyn crate::player::NowPlayingScreen>,
        Duration::from_secs(1),
    );
    (Session::new(library, player, console), buf)
}

fn run(session: &mut Session, input: &str) {
    session.run_loop(&mut Cursor::new(input)).unwrap();
}

#[test]
fn parse_library_input_accepts_commands_and_selections() {
    assert_eq!(parse_library_input("q"), Some(Command::Quit));
    assert_eq!(parse_library_input(" Q \n"), Some(Command::Quit));
    assert_eq!(parse_library_input("p"), Some(Command::TogglePause));
    assert_eq!(parse_library_input("s"), Some(Command::Stop));
    assert_eq!(parse_library_input("n"), Some(Command::Next));
    assert_eq!(parse_library_input("r"), Some(Command::Previous));
    assert_eq!(parse_library_input("v"), Some(Command::ShowPlayer));
    assert_eq!(
        parse_library_input("1 2"),
        Some(Command::Select { album: 1, song: 2 })
    );
    assert_eq!(
        parse_library_input("  10   3  "),
        Some(Command::Select { album: 10, song: 3 })
    );
    // Zero parses; the bounds check rejects it with a proper message.
    assert_eq!(
        parse_library_input("0 1"),
        Some(Command::Select { album: 0, song: 1 })
    );
}

#[test]
fn parse_library_input_rejects_everything_else() {
    assert_eq!(parse_library_input(""), None);
    assert_eq!(parse_library_input("x"), None);
    assert_eq!(parse_library_input("1"), None);
    assert_eq!(parse_library_input("1 2 3"), None);
    assert_eq!(parse_library_input("one two"), None);
    assert_eq!(parse_library_input("1 -2"), None);
}

#[test]
fn parse_player_input_accepts_the_reduced_set() {
    assert_eq!(parse_player_input("q"), Some(Command::Quit));
    assert_eq!(parse_player_input("P"), Some(Command::TogglePause));
    assert_eq!(parse_player_input("s"), Some(Command::Stop));
    assert_eq!(parse_player_input("n"), Some(Command::Next));
    assert_eq!(parse_player_input("b"), Some(Command::Previous));
    assert_eq!(parse_player_input("l"), Some(Command::ShowLibrary));
    assert_eq!(parse_player_input("v"), None);
    assert_eq!(parse_player_input("1 2"), None);
    assert_eq!(parse_player_input("nonsense"), None);
}

#[test]
fn resolve_selection_converts_to_zero_based() {
    let lib = sample_library();
    assert_eq!(resolve_selection(&lib, 1, 2), Ok(SongPos::new(0, 1)));
    assert_eq!(resolve_selection(&lib, 2, 1), Ok(SongPos::new(1, 0)));
}

#[test]
fn resolve_selection_rejects_out_of_range_numbers() {
    let lib = sample_library();
    assert_eq!(resolve_selection(&lib, 0, 1), Err(SelectionError::Album));
    assert_eq!(resolve_selection(&lib, 3, 1), Err(SelectionError::Album));
    assert_eq!(resolve_selection(&lib, 1, 0), Err(SelectionError::Song));
    assert_eq!(resolve_selection(&lib, 1, 3), Err(SelectionError::Song));
    assert_eq!(resolve_selection(&lib, 2, 2), Err(SelectionError::Song));
}

#[test]
fn quit_ends_the_loop_after_showing_the_library() {
    let (mut session, buf) = session();
    run(&mut session, "q\n");
    let text = buf.text();
    assert!(text.contains("Music Library"));
    assert!(text.contains("Enter album and song numbers"));
}

#[test]
fn end_of_input_ends_the_loop() {
    let (mut session, _buf) = session();
    run(&mut session, "");
}

#[test]
fn out_of_range_album_reports_and_leaves_state_unchanged() {
    let (mut session, buf) = session();
    run(&mut session, "3 1\nq\n");
    assert!(buf.text().contains("Invalid album number"));

    let snap = session.player.snapshot();
    assert_eq!(snap.status, PlaybackStatus::Stopped);
    assert_eq!(snap.current, None);
}

#[test]
fn out_of_range_song_reports_and_leaves_state_unchanged() {
    let (mut session, buf) = session();
    run(&mut session, "1 9\nq\n");
    assert!(buf.text().contains("Invalid song number"));
    assert_eq!(session.player.snapshot().current, None);
}

#[test]
fn unparsable_input_reports_and_redisplays_the_prompt() {
    let (mut session, buf) = session();
    run(&mut session, "boom\nq\n");
    let text = buf.text();
    assert!(text.contains("Invalid input. Please try again."));
    // The prompt comes back after the error.
    assert!(text.matches("Enter album and song numbers").count() >= 2);
}

#[test]
fn valid_selection_starts_playback_and_shows_the_player() {
    let (mut session, _buf) = session();
    run(&mut session, "1 2\nq\n");

    let snap = session.player.snapshot();
    assert_eq!(snap.status, PlaybackStatus::Playing);
    assert_eq!(snap.current, Some(SongPos::new(0, 1)));
    assert!(snap.visible);
}

#[test]
fn player_view_ignores_unknown_input_and_l_returns_to_library() {
    let (mut session, buf) = session();
    run(&mut session, "1 1\nxyz\nl\nq\n");

    let snap = session.player.snapshot();
    assert_eq!(snap.status, PlaybackStatus::Playing);
    assert_eq!(snap.current, Some(SongPos::new(0, 0)));
    assert!(!snap.visible);
    // Unknown input in the player view produces no error message.
    assert!(!buf.text().contains("Invalid input"));
}

#[test]
fn stop_from_the_player_view_returns_to_the_library() {
    let (mut session, buf) = session();
    run(&mut session, "1 1\ns\nq\n");

    let snap = session.player.snapshot();
    assert_eq!(snap.status, PlaybackStatus::Stopped);
    assert_eq!(snap.current, None);
    // The library table was shown again after stopping.
    assert!(buf.text().matches("Enter album and song numbers").count() >= 2);
}

#[test]
fn next_from_the_player_view_advances_the_song() {
    let (mut session, _buf) = session();
    run(&mut session, "1 1\nn\nq\n");
    assert_eq!(
        session.player.snapshot().current,
        Some(SongPos::new(0, 1))
    );
}

#[test]
fn run_never_leaves_playback_running() {
    let (mut session, _buf) = session();
    run(&mut session, "1 1\nq\n");
    assert_eq!(
        session.player.snapshot().status,
        PlaybackStatus::Playing
    );

    // The cleanup path mirrors Session::run.
    session.player.stop();
    assert_eq!(session.player.snapshot().status, PlaybackStatus::Stopped);
}
