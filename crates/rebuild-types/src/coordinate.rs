//! Package coordinates (group:artifact[:version])

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate parsing errors
#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("coordinate contains illegal characters: {0}")]
    IllegalCharacters(String),

    #[error("expected '{expected}' format, got: {got}")]
    BadShape { expected: &'static str, got: String },
}

/// A package coordinate: group and artifact identifier, optionally versioned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Gav {
    /// Create a versioned coordinate from its parts.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
        }
    }

    /// Parse a `group:artifact` coordinate.
    pub fn parse(coordinate: &str) -> Result<Self, CoordinateError> {
        validate_charset(coordinate)?;

        match coordinate.split(':').collect::<Vec<_>>().as_slice() {
            [group, artifact] if !group.is_empty() && !artifact.is_empty() => Ok(Self {
                group_id: (*group).to_string(),
                artifact_id: (*artifact).to_string(),
                version: None,
            }),
            _ => Err(CoordinateError::BadShape {
                expected: "group:artifact",
                got: coordinate.to_string(),
            }),
        }
    }

    /// Parse a `group:artifact:version` coordinate.
    pub fn parse_versioned(coordinate: &str) -> Result<Self, CoordinateError> {
        validate_charset(coordinate)?;

        match coordinate.split(':').collect::<Vec<_>>().as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self {
                    group_id: (*group).to_string(),
                    artifact_id: (*artifact).to_string(),
                    version: Some((*version).to_string()),
                })
            }
            _ => Err(CoordinateError::BadShape {
                expected: "group:artifact:version",
                got: coordinate.to_string(),
            }),
        }
    }

    /// Render the coordinate as `group:artifact[:version]`.
    pub fn coordinate(&self) -> String {
        match &self.version {
            Some(version) => format!("{}:{}:{}", self.group_id, self.artifact_id, version),
            None => format!("{}:{}", self.group_id, self.artifact_id),
        }
    }

    /// Render the coordinate as an index document path: dots in the group
    /// and artifact become path separators, the version (unless trimmed)
    /// a trailing segment.
    pub fn path(&self, trim_version: bool) -> String {
        let mut path = format!(
            "{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id.replace('.', "/")
        );
        if !trim_version {
            if let Some(version) = &self.version {
                path.push('/');
                path.push_str(version);
            }
        }
        path
    }
}

impl std::fmt::Display for Gav {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.coordinate())
    }
}

/// Letters, digits, `.`, `:` and `-` only; rejected before any lookup runs.
fn validate_charset(coordinate: &str) -> Result<(), CoordinateError> {
    let ok = coordinate
        .chars()
        .all(|ch| ch.is_alphanumeric() || matches!(ch, '.' | ':' | '-'));
    if ok {
        Ok(())
    } else {
        Err(CoordinateError::IllegalCharacters(coordinate.to_string()))
    }
}
