/// User settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/image-sorter/settings.json
/// - macOS: ~/Library/Application Support/image-sorter/settings.json
/// - Windows: %APPDATA%\image-sorter\settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, SorterError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn to_theme(self) -> iced::Theme {
        match self {
            ThemeChoice::Dark => iced::Theme::Dark,
            ThemeChoice::Light => iced::Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Newline separated quotes shown under the current image
    pub quotes_file: PathBuf,
    /// Seconds between quote changes
    pub quote_interval_secs: u64,
    /// Longest edge of a category preview, in pixels
    pub preview_size: u32,
    /// Width of one category card in the grid
    pub category_width: f32,
    pub theme: ThemeChoice,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quotes_file: PathBuf::from("quotes.txt"),
            quote_interval_secs: 15,
            preview_size: 256,
            category_width: 220.0,
            theme: ThemeChoice::Dark,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("image-sorter");
        path.push("settings.json");
        path
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SorterError::io(path, e)),
        }
    }

    /// Like `load`, but logs problems and falls back to the defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                info!("⚙️  Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("⚠️  Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SorterError::io(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data).map_err(|e| SorterError::io(path, e))
    }
}
