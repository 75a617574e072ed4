//! Lookup error taxonomy
//!
//! The not-found states are distinct and user-facing; transport and decode
//! failures on the way to the index or the graph service surface as
//! internal errors.

use rebuild_types::RegistryError;
use thiserror::Error;

/// Errors produced by the lookup layer.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("registry is not supported: {0}")]
    RegistryNotRecognized(String),

    #[error("dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("index fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("index read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("package descriptor parse failed: {0}")]
    Descriptor(String),

    #[error("dependency graph query failed: {0}")]
    Graph(String),
}

impl LookupError {
    /// Whether this is the "dependency not found" state, as opposed to an
    /// unrecognized registry or an internal failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DependencyNotFound(_))
    }
}

impl From<RegistryError> for LookupError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::NotRecognized(registry) => Self::RegistryNotRecognized(registry),
        }
    }
}

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;
