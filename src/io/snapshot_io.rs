use std::fs;
use std::path::{Path, PathBuf};

use crate::model::project::Project;

/// Error type for snapshot loading
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a JSON array of projects. The file is never written back.
pub fn read_snapshot(path: &Path) -> Result<Vec<Project>, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|e| SnapshotError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SnapshotError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
