use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or
/// `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Timer cadence in milliseconds. The playback simulation wakes this
    /// often to update elapsed time and redraw the panel.
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { tick_ms: 1000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Title rendered above the library table.
    pub library_title: String,
    /// Whether to clear the screen before each table/panel redraw.
    pub clear_screen: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            library_title: "Music Library".to_string(),
            clear_screen: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log file path. Logging is disabled when unset; stdout belongs to the
    /// display surface.
    pub file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is not set.
    pub filter: Option<String>,
}
