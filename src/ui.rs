//! Console rendering: the library table, the now-playing panel and the
//! prompts around them.
//!
//! The builders are pure string producers so they can be tested without a
//! terminal; [`Console`] owns the output handle and implements the engine's
//! render seam.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::style::{Color, Stylize};
use crossterm::{cursor, terminal};

use crate::config::UiSettings;
use crate::library::Library;
use crate::player::{NowPlayingScreen, PlaybackSnapshot};

const HEADERS: [&str; 5] = ["Index", "Artist", "Album", "Genre", "Songs"];
const COLUMN_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
];

const CONTROLS_LEGEND: &str = "[P]ause/Play | [L]ibrary | [S]top | [N]ext | [B]ack | [Q]uit";

/// Format a `Duration` as `M:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the bordered library table: one row per album, songs as a numbered
/// multi-line cell with durations.
pub fn library_table(library: &Library, title: &str) -> String {
    let rows: Vec<[Vec<String>; 5]> = library
        .albums
        .iter()
        .enumerate()
        .map(|(idx, album)| {
            let songs: Vec<String> = album
                .songs
                .iter()
                .enumerate()
                .map(|(i, song)| {
                    format!("{}. {} ({})", i + 1, song.name, format_mmss(song.duration))
                })
                .collect();
            [
                vec![(idx + 1).to_string()],
                vec![album.artist.clone()],
                vec![album.title.clone()],
                vec![album.genre.clone()],
                songs,
            ]
        })
        .collect();

    let mut widths: [usize; 5] = HEADERS.map(str::len);
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            for line in cell {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let mut out = String::new();
    let total_width: usize = widths.iter().sum::<usize>() + 3 * widths.len() + 1;
    if !title.is_empty() {
        let centered = format!("{title:^total_width$}");
        out.push_str(&format!("{}\n", centered.bold()));
    }

    out.push_str(&border_line(&widths, '┌', '┬', '┐'));
    let header_cells: Vec<Vec<String>> = HEADERS.iter().map(|h| vec![h.to_string()]).collect();
    push_row(&mut out, &header_cells, &widths, true);
    out.push_str(&border_line(&widths, '├', '┼', '┤'));

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str(&border_line(&widths, '├', '┼', '┤'));
        }
        push_row(&mut out, row.as_slice(), &widths, false);
    }
    out.push_str(&border_line(&widths, '└', '┴', '┘'));
    out
}

fn border_line(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(w + 2));
    }
    line.push(right);
    line.push('\n');
    line
}

/// Append one logical row; cells may span multiple lines and are padded to
/// the row height. Padding happens before styling so ANSI codes don't skew
/// the column widths.
fn push_row(out: &mut String, cells: &[Vec<String>], widths: &[usize], header: bool) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    for line_no in 0..height {
        out.push('│');
        for (col, cell) in cells.iter().enumerate() {
            let text = cell.get(line_no).map(String::as_str).unwrap_or("");
            let pad = widths[col] - text.chars().count();
            let padded = format!(" {}{} ", text, " ".repeat(pad));
            let styled = if header {
                padded.bold().to_string()
            } else {
                padded.with(COLUMN_COLORS[col]).to_string()
            };
            out.push_str(&styled);
            out.push('│');
        }
        out.push('\n');
    }
}

/// Build the centered now-playing panel: status word, song/album/artist,
/// elapsed/total time and the control legend.
pub fn now_playing_panel(snapshot: &PlaybackSnapshot, width: usize) -> String {
    let song = snapshot.song.as_deref().unwrap_or("-");
    let album = snapshot.album.as_deref().unwrap_or("-");
    let artist = snapshot.artist.as_deref().unwrap_or("-");
    let total = snapshot.total.map(format_mmss).unwrap_or_else(|| "-".into());

    let lines = [
        format!("Now {}: {}", snapshot.status, song),
        format!("From: {album} by {artist}"),
        format!("Time: {} / {}", format_mmss(snapshot.elapsed), total),
        String::new(),
        "Controls:".to_string(),
        CONTROLS_LEGEND.to_string(),
    ];

    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    let panel_width = inner + 2;
    let margin = " ".repeat(width.saturating_sub(panel_width) / 2);

    let mut out = String::new();
    out.push_str(&format!("{margin}╭{}╮\n", "─".repeat(inner)));
    for line in &lines {
        let pad = inner - 2 - line.chars().count();
        let left = pad / 2;
        let right = pad - left;
        out.push_str(&format!(
            "{margin}│ {}{line}{} │\n",
            " ".repeat(left),
            " ".repeat(right)
        ));
    }
    out.push_str(&format!("{margin}╰{}╯\n", "─".repeat(inner)));
    out
}

/// Owns the display surface. Both the session (table, prompts, errors) and
/// the timer task (now-playing panel) write through it; the internal lock
/// only covers output, never playback state.
pub struct Console {
    out: Mutex<Box<dyn Write + Send>>,
    clear_screen: bool,
    library_title: String,
}

impl Console {
    pub fn new(ui: &UiSettings) -> Self {
        Self::with_writer(ui, Box::new(io::stdout()))
    }

    /// Console writing somewhere other than stdout; used by tests.
    pub fn with_writer(ui: &UiSettings, out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            clear_screen: ui.clear_screen,
            library_title: ui.library_title.clone(),
        }
    }

    pub fn show_library(&self, library: &Library) -> io::Result<()> {
        let table = library_table(library, &self.library_title);
        let mut out = self.out.lock().unwrap();
        self.clear(&mut out)?;
        out.write_all(table.as_bytes())?;
        out.flush()
    }

    pub fn show_prompt(&self) -> io::Result<()> {
        let mut out = self.out.lock().unwrap();
        writeln!(out)?;
        writeln!(
            out,
            "Enter album and song numbers (e.g., '1 2' for first album, second song)"
        )?;
        writeln!(
            out,
            "Or enter a command: [P]ause/Play, [S]top, [N]ext, P[R]evious, [V]iew Playback, [Q]uit"
        )?;
        write!(out, "> ")?;
        out.flush()
    }

    pub fn message(&self, text: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap();
        writeln!(out, "{}", text.with(Color::Red))?;
        out.flush()
    }

    fn clear(&self, out: &mut Box<dyn Write + Send>) -> io::Result<()> {
        if self.clear_screen {
            crossterm::queue!(
                out,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        Ok(())
    }
}

impl NowPlayingScreen for Console {
    fn draw(&self, snapshot: &PlaybackSnapshot) {
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let panel = now_playing_panel(snapshot, width);
        // Rendering is best-effort: a failed write must never take down the
        // timer task or the session.
        if let Ok(mut out) = self.out.lock() {
            let _ = self.clear(&mut out);
            let _ = out.write_all(panel.as_bytes());
            let _ = out.flush();
        }
    }
}
