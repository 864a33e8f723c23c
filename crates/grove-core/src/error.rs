use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroveError {
    #[error("Invalid document snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),
    #[error("Invalid canvas settings: {0}")]
    Settings(#[source] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
