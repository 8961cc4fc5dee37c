//! Configuration loading and parsing.
//!
//! Parses `input-math.toml` (or an override path provided by the binary):
//!
//! ```toml
//! value = "x^2"            # initial canonical value
//! [history]
//! capacity = 20
//! [symbols]
//! show = "basic,greek"
//! [surface]
//! space_behaves_like_tab = true
//! ```
//!
//! Every field is optional. A missing file yields defaults silently; an
//! unreadable or malformed file yields defaults and a `warn` on the `config`
//! target. Unknown fields are ignored so newer files still load. A history
//! capacity above [`MAX_HISTORY_CAPACITY`] is clamped with a `warn`.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "input-math.toml";

/// Upper bound accepted for `[history] capacity`.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        20
    }

    fn clamp_capacity(&mut self) {
        if self.capacity > MAX_HISTORY_CAPACITY {
            warn!(
                target: "config",
                requested = self.capacity,
                max = MAX_HISTORY_CAPACITY,
                "history_capacity_clamped"
            );
            self.capacity = MAX_HISTORY_CAPACITY;
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SymbolsConfig {
    #[serde(default = "SymbolsConfig::default_show")]
    pub show: String,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            show: Self::default_show(),
        }
    }
}

impl SymbolsConfig {
    fn default_show() -> String {
        "basic,greek".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    #[serde(default = "SurfaceConfig::default_space_behaves_like_tab")]
    pub space_behaves_like_tab: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            space_behaves_like_tab: Self::default_space_behaves_like_tab(),
        }
    }
}

impl SurfaceConfig {
    const fn default_space_behaves_like_tab() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub symbols: SymbolsConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,     // original file string (optional)
    pub source: Option<PathBuf>, // path the file was read from
    pub file: ConfigFile,        // parsed (or default) data
}

/// Prefer `input-math.toml` in the working directory, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("input-math").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn parse_str(path: PathBuf, content: &str) -> Result<ConfigFile, ConfigError> {
    toml::from_str::<ConfigFile>(content).map_err(|source| ConfigError::Parse { path, source })
}

fn read(path: &PathBuf) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.clone(),
            source,
        }),
    }
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match read(&path) {
        Ok(Some(content)) => content,
        Ok(None) => return Ok(Config::default()),
        Err(err) => {
            warn!(target: "config", %err, "config_read_failed_using_defaults");
            return Ok(Config::default());
        }
    };
    match parse_str(path.clone(), &content) {
        Ok(mut file) => {
            file.history.clamp_capacity();
            info!(
                target: "config",
                path = %path.display(),
                capacity = file.history.capacity,
                symbols = file.symbols.show.as_str(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
            })
        }
        Err(err) => {
            warn!(target: "config", %err, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Apply command-line overrides on top of the file values.
    pub fn apply_overrides(&mut self, symbols: Option<String>, value: Option<String>) {
        if let Some(show) = symbols {
            info!(target: "config", show = show.as_str(), "symbols_override");
            self.file.symbols.show = show;
        }
        if let Some(value) = value {
            info!(target: "config", len = value.len(), "value_override");
            self.file.value = value;
        }
    }
}
