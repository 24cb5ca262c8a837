//! Error types for encounter definitions and segmentation

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while walking the event stream
#[derive(Debug, Error)]
pub enum SegmentError {
    /// A start or wipe record carried no usable timestamp, so no duration
    /// can be computed for the pull.
    #[error("invalid timestamp in {source_file} at line {line_number}")]
    InvalidTimestamp {
        source_file: Arc<str>,
        line_number: u64,
    },

    #[error("invalid encounter definition")]
    InvalidDefinition(#[from] DefinitionError),
}

/// Errors loading or validating an encounter definition
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("encounter definition field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    #[error("encounter definition has {count} phase gates, at most {max} are supported")]
    TooManyPhaseGates { count: usize, max: usize },

    #[error("minimum_pull_secs is {secs}, must be between 0 and {max}")]
    InvalidMinimumDuration { secs: i64, max: i64 },
}
