//! Settings file loading
//!
//! Every section and field is optional; anything missing takes its default.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use logview_render::{DEFAULT_INDENT, DEFAULT_TITLE};

/// Settings file looked up in the working directory
pub const CONFIG_FILENAME: &str = "logview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub viewer: ViewerSettings,
    pub editor: EditorSettings,
}

/// HTML document output
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub title: String,
    /// Spaces per level in expanded JSON (clamped to 1..=8 when used)
    pub indent: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            indent: DEFAULT_INDENT,
        }
    }
}

/// Terminal viewer columns
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub show_timestamps: bool,
    pub show_function_names: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            show_function_names: true,
        }
    }
}

/// How open-location requests reach an editor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Editor command; empty means $VISUAL, then $EDITOR
    pub command: String,

    /// Command line template.
    /// Variables: $EDITOR, $FILE, $LINE, $COLUMN
    pub open_pattern: String,

    /// Root for relative source paths (default: current directory)
    pub workspace: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            command: String::new(),
            open_pattern: default_open_pattern(),
            workspace: None,
        }
    }
}

fn default_open_pattern() -> String {
    "$EDITOR $FILE:$LINE:$COLUMN".to_string()
}

impl EditorSettings {
    /// Configured command, or the one named by the environment
    pub fn resolve_command(&self) -> Option<String> {
        if !self.command.trim().is_empty() {
            return Some(self.command.trim().to_string());
        }
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// Read a settings file; Ok(None) when it does not exist
pub fn read_settings(path: &Path) -> Result<Option<Settings>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load settings from an explicit path or `./logview.toml`, falling back to
/// defaults on any problem
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    match read_settings(&path) {
        Ok(Some(settings)) => {
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => {
            if explicit.is_some() {
                warn!("Config file {:?} not found, using defaults", path);
            } else {
                debug!("No config file at {:?}, using defaults", path);
            }
            Settings::default()
        }
        Err(e) => {
            warn!("{}", e);
            Settings::default()
        }
    }
}
