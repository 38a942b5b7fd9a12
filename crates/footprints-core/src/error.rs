//! Error types for footprints-stac

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintsError {
    // Partition path errors
    #[error("Partition path '{path}' has {found} segments, expected at least {expected}")]
    PathTooShort { path: String, found: usize, expected: usize },

    #[error("Invalid partition segment '{segment}' in '{path}': {reason}")]
    PathSegment { path: String, segment: String, reason: String },

    #[error("Invalid processing date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Invalid quadkey '{value}': {reason}")]
    InvalidQuadkey { value: String, reason: String },

    // Statistics table errors
    #[error("Region statistics file not found at {path}")]
    StatsNotFound { path: PathBuf },

    #[error("Malformed region statistics table: {reason}")]
    StatsMalformed { reason: String },

    // Table inference errors
    #[error("Cannot inspect table at {href}: {reason}")]
    Inspection { href: String, reason: String },

    #[error("Unknown dataset variant: {name}. Use ms-buildings, ms-buildings-delta, or bing-buildings")]
    UnknownDataset { name: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FootprintsError {
    fn from(err: serde_json::Error) -> Self {
        FootprintsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FootprintsError>;
