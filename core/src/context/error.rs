//! Error types for context operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors during log directory enumeration
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("log directory {path} does not exist")]
    NotFound { path: PathBuf },

    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file metadata for {path}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}
