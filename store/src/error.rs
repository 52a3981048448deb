use std::path::PathBuf;

use thiserror::Error;

/// Storage result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write store file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored profile has unsupported schema version {found} (max {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("store lock poisoned")]
    Poisoned,
}
