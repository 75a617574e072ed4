//! Indexer error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the indexing pipeline.
///
/// Parse failures are non-fatal (the offending attestation set is skipped
/// and logged); persistence failures abort the run.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported buildinfo spec version {version:?} in {path}")]
    UnsupportedSpecVersion { path: PathBuf, version: String },

    #[error("unrecognized output layout in {path}")]
    UnknownOutputLayout { path: PathBuf },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to write index document {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize index document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("indexing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for indexer operations
pub type IndexResult<T> = Result<T, IndexError>;
