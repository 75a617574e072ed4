//! Index document source selection
//!
//! Exactly one source is active: a local index directory or a remote
//! index mirror. A local miss, a remote 404, and a decode failure all
//! report as "dependency not found"; transport failures are internal.

use crate::error::{LookupError, LookupResult};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// Bounded timeout for remote index fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where index documents are read from.
#[derive(Debug, Clone)]
pub enum IndexSource {
    Local { dir: PathBuf },
    Remote { base_url: String, client: reqwest::Client },
}

impl IndexSource {
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local { dir: dir.into() }
    }

    pub fn remote(base_url: impl Into<String>) -> LookupResult<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self::Remote {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetch and decode one index document at a path relative to the
    /// index base. `coordinate` only labels the not-found error.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        relative_path: &str,
        coordinate: &str,
    ) -> LookupResult<T> {
        match self {
            Self::Local { dir } => {
                let path = dir.join(relative_path);
                let content = match tokio::fs::read(&path).await {
                    Ok(content) => content,
                    Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                        return Err(LookupError::DependencyNotFound(coordinate.to_string()));
                    }
                    Err(error) => return Err(LookupError::Read(error)),
                };
                serde_json::from_slice(&content)
                    .map_err(|_| LookupError::DependencyNotFound(coordinate.to_string()))
            }
            Self::Remote { base_url, client } => {
                let url = format!("{base_url}/{relative_path}");
                let response = client.get(&url).send().await?;
                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(LookupError::DependencyNotFound(coordinate.to_string()));
                }
                let response = response.error_for_status()?;
                response
                    .json()
                    .await
                    .map_err(|_| LookupError::DependencyNotFound(coordinate.to_string()))
            }
        }
    }
}
