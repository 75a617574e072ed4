//! Dependency-graph service client
//!
//! Enumerates a coordinate's direct and transitive runtime dependencies
//! through a paginated POST endpoint. The trait seam keeps the expander
//! testable without a network.

use crate::error::{LookupError, LookupResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 20;

/// One dependency edge reported by the graph service, identified by
/// (namespace, name, version).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct GraphComponent {
    #[serde(rename = "dependencyNamespace", default)]
    pub namespace: String,
    #[serde(rename = "dependencyName", default)]
    pub name: String,
    #[serde(rename = "dependencyVersion", default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
struct GraphRequest<'a> {
    purl: &'a str,
    page: u32,
    size: u32,
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    components: Vec<GraphComponent>,
}

/// Source of transitive dependency listings for a package URL.
#[async_trait]
pub trait DependencyGraph: Send + Sync {
    /// Enumerate every direct and transitive dependency of `purl`.
    async fn transitive_dependencies(&self, purl: &str) -> LookupResult<Vec<GraphComponent>>;
}

/// HTTP implementation against the public component-browse endpoint.
#[derive(Debug, Clone)]
pub struct HttpDependencyGraph {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDependencyGraph {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://central.sonatype.com/api/internal/browse/dependencies";

    pub fn new(endpoint: impl Into<String>) -> LookupResult<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch_page(&self, purl: &str, page: u32) -> LookupResult<GraphResponse> {
        let request = GraphRequest {
            purl,
            page,
            size: PAGE_SIZE,
            search_term: "",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Graph(format!(
                "unexpected status {} for {purl} page {page}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|error| LookupError::Graph(error.to_string()))
    }
}

#[async_trait]
impl DependencyGraph for HttpDependencyGraph {
    async fn transitive_dependencies(&self, purl: &str) -> LookupResult<Vec<GraphComponent>> {
        let mut components = Vec::new();

        // A short page terminates the pagination.
        for page in 0.. {
            let response = self.fetch_page(purl, page).await?;
            let page_len = response.components.len();
            components.extend(response.components);
            if page_len < PAGE_SIZE as usize {
                break;
            }
        }

        tracing::debug!(purl, count = components.len(), "fetched transitive dependencies");
        Ok(components)
    }
}
