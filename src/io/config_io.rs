use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::TrackerConfig;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub const CONFIG_FILE: &str = "tracker.toml";

/// Read `tracker.toml`. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<TrackerConfig, ConfigError> {
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_config(text: &str) -> Result<TrackerConfig, toml::de::Error> {
    toml::from_str(text)
}
