//! Startup wiring: CLI, settings, logging, library load and the session.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LogSettings};
use crate::library::{self, Library};
use crate::player::{NowPlayingScreen, Player, SystemClock};
use crate::session::Session;
use crate::ui::Console;

#[derive(Debug, Parser)]
#[command(
    name = "encore",
    version,
    about = "Browse a music library and simulate playback in the terminal",
    group = ArgGroup::new("source").required(true)
)]
struct Cli {
    /// Path to the library JSON file.
    #[arg(long, value_name = "FILE", group = "source")]
    library: Option<PathBuf>,

    /// Load the library from a remote URL (not implemented yet; yields an
    /// empty library).
    #[arg(long, value_name = "URL", group = "source")]
    remote: Option<String>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings();
    let _log_guard = init_logging(&settings.log);

    let library = if let Some(path) = &cli.library {
        library::load_library(path)?
    } else if let Some(url) = &cli.remote {
        library::fetch_library(url)
    } else {
        // The clap group guarantees one source.
        Library::default()
    };
    info!(albums = library.albums.len(), "starting session");

    let library = Arc::new(library);
    let console = Arc::new(Console::new(&settings.ui));
    let player = Player::new(
        Arc::clone(&library),
        Arc::new(SystemClock::new()),
        Arc::clone(&console) as Arc<dyn NowPlayingScreen>,
        Duration::from_millis(settings.playback.tick_ms),
    );

    let mut session = Session::new(library, player, console);
    session.run()?;
    Ok(())
}

fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("encore: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("encore: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Set up file logging when configured. Stdout is the display surface, so
/// without a log file tracing stays uninitialized and events are dropped.
fn init_logging(log: &LogSettings) -> Option<WorkerGuard> {
    let file = log.file.as_ref()?;
    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let name = file.file_name()?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log.filter.as_deref().unwrap_or("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
