use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixels scrolled per directional step, matching one line of a wheel
/// scroll.
pub const DEFAULT_SCROLL_STEP: f64 = 40.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read focus settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("scroll step must be positive, got {0}")]
    InvalidScrollStep(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    /// Use the caret position as the Tab starting point when nothing is
    /// focused, and move the caret along with focus.
    pub caret_browsing: bool,
    /// Route arrow keys to directional navigation.
    pub spatial_navigation: bool,
    pub scroll_step: f64,
    /// Let the embedder take focus when Tab runs off the end of the page
    /// instead of wrapping.
    pub tab_cycles_through_chrome: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            caret_browsing: false,
            spatial_navigation: false,
            scroll_step: DEFAULT_SCROLL_STEP,
            tab_cycles_through_chrome: true,
        }
    }
}

impl FocusSettings {
    /// Loads settings from `config_path`, falling back to defaults when no
    /// path is given or the file does not exist.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, SettingsError> {
        let settings = match config_path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(&path)?;
                let settings: FocusSettings = serde_yaml::from_str(&contents)?;
                tracing::debug!(target: "focus", path = %path.display(), "loaded focus settings");
                settings
            }
            _ => FocusSettings::default(),
        };

        if !(settings.scroll_step > 0.0) {
            return Err(SettingsError::InvalidScrollStep(settings.scroll_step));
        }
        Ok(settings)
    }

    /// `FRONTIER_FOCUS_CONFIG` when set, otherwise `focus.yaml` in the
    /// platform config directory.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load(config_path())
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FRONTIER_FOCUS_CONFIG") {
        return Some(PathBuf::from(path));
    }

    ProjectDirs::from("org", "Frontier", "FrontierBrowser").map(|dirs| {
        let mut path = dirs.config_dir().to_path_buf();
        path.push("focus.yaml");
        path
    })
}
