//! Configuration for hunkpeek.
//!
//! Read from `$XDG_CONFIG_HOME/hunkpeek/config.toml` (falling back to
//! `~/.config/hunkpeek/config.toml`). Every key is optional:
//!
//! ```toml
//! renderer = "floating"          # "inline", "floating", "none" or a custom name
//! revision = "HEAD"
//! boundary_pattern = "^@@.*@@"
//! theme = "catppuccin-mocha"     # or "dark"
//!
//! [floating]
//! width_pct = 70
//! height_pct = 60
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diff::{BoundaryPattern, DEFAULT_BOUNDARY_PATTERN};
use crate::error::ConfigError;

/// Size of the floating hunk panel, as percentages of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FloatingConfig {
    pub width_pct: u16,
    pub height_pct: u16,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self { width_pct: 70, height_pct: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Renderer name looked up in the renderer registry. `None` or `"none"`
    /// selects the raw-diff fallback.
    pub renderer: Option<String>,
    /// Reference revision the working file is diffed against.
    pub revision: String,
    /// Regex recognising hunk header lines.
    pub boundary_pattern: String,
    pub theme: String,
    pub floating: FloatingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            renderer: Some("floating".to_owned()),
            revision: "HEAD".to_owned(),
            boundary_pattern: DEFAULT_BOUNDARY_PATTERN.to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            floating: FloatingConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults; unreadable or malformed files are
    /// errors so the caller can report them before falling back.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Compiled boundary pattern; an invalid regex falls back to the default.
    pub fn boundary(&self) -> BoundaryPattern {
        BoundaryPattern::or_default(&self.boundary_pattern)
    }
}

/// Returns the path to the hunkpeek config file.
///
/// Prefers `$XDG_CONFIG_HOME/hunkpeek/config.toml`; falls back to
/// `~/.config/hunkpeek/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("hunkpeek").join("config.toml")
}
