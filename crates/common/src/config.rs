//! Persisted user settings and logging configuration.
//!
//! Settings are a flat record serialized as JSON text under one fixed
//! storage key. A missing file and a parse failure both map to the
//! documented defaults; the engine never refuses to start over bad settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed storage key for the settings record.
pub const STORAGE_KEY: &str = "code-animation-settings";

/// Recording aspect ratio presets offered by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    /// Height matching this ratio for the given width.
    pub fn height_for_width(&self, width: u32) -> u32 {
        match self {
            AspectRatio::Wide => width * 9 / 16,
            AspectRatio::Tall => width * 16 / 9,
            AspectRatio::Portrait => width * 4 / 3,
        }
    }
}

/// One editor tab the host restores between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorTab {
    /// Display name (file name shown in the window chrome).
    pub name: String,

    /// Pasted source text the typing animation replays.
    pub content: String,
}

/// Persisted user settings.
///
/// Consumed by the host as configuration; the capture engine itself only
/// sees the values the host passes through (dimensions, delays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Per-character typing delay in milliseconds.
    pub typing_speed_ms: u64,

    /// Selected recording aspect ratio.
    pub aspect_ratio: AspectRatio,

    /// Hold time before the typing animation starts, in milliseconds.
    pub start_delay_ms: u64,

    /// Hold time after the typing animation ends, in milliseconds.
    pub end_delay_ms: u64,

    /// Output resolution in logical pixels.
    pub recording_width: u32,
    pub recording_height: u32,

    /// Editor display preferences.
    pub show_preview: bool,
    pub hide_file_name: bool,
    pub font_size: u32,
    pub hide_line_numbers: bool,

    /// Custom window title rendered in the scene chrome.
    pub window_title: String,

    /// Restored editor tabs and the active tab key.
    pub tabs: Vec<EditorTab>,
    pub active_tab: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            typing_speed_ms: 100,
            aspect_ratio: AspectRatio::Wide,
            start_delay_ms: 2000,
            end_delay_ms: 2000,
            recording_width: 1280,
            recording_height: 720,
            show_preview: false,
            hide_file_name: false,
            font_size: 14,
            hide_line_numbers: false,
            window_title: String::new(),
            tabs: vec![EditorTab {
                name: "code.ts".to_string(),
                content: String::new(),
            }],
            active_tab: "0".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&settings_file_path())
    }

    /// Load settings from an explicit path, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => {
                        tracing::warn!("Failed to parse settings at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Save settings to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&settings_file_path())
    }

    /// Save settings to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "codereel=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

/// Standard settings file location.
pub fn settings_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("codereel").join(format!("{STORAGE_KEY}.json"))
}
