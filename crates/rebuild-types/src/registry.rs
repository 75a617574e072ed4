//! Registry name resolution
//!
//! The table is built once at startup and handed to the lookup service by
//! reference; there is no process-global mutable state.

use std::collections::BTreeMap;
use thiserror::Error;

/// Registry resolution errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry is not supported: {0}")]
    NotRecognized(String),
}

/// Immutable mapping from registry hosts to canonical short names.
#[derive(Debug, Clone)]
pub struct RegistryTable {
    names: Vec<String>,
    host_to_name: BTreeMap<String, String>,
    default_host: String,
}

impl RegistryTable {
    /// Host of the default public registry (Maven Central).
    pub const DEFAULT_HOST: &'static str = "repo.maven.apache.org/maven2";

    /// Build the table with the registries the index covers.
    pub fn new() -> Self {
        let mut host_to_name = BTreeMap::new();
        host_to_name.insert("repo.maven.apache.org/maven2".to_string(), "mavencentral".to_string());
        host_to_name.insert("repo1.maven.org/maven2".to_string(), "mavencentral".to_string());
        host_to_name.insert("plugins.gradle.org/m2".to_string(), "gradlepluginportal".to_string());

        Self {
            names: vec!["mavencentral".to_string(), "gradlepluginportal".to_string()],
            host_to_name,
            default_host: Self::DEFAULT_HOST.to_string(),
        }
    }

    /// Host used when a request does not name a registry.
    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    /// Resolve a canonical short name or host/path form to the canonical
    /// short name used in index document paths.
    pub fn resolve(&self, registry: &str) -> Result<&str, RegistryError> {
        if let Some(name) = self.names.iter().find(|name| *name == registry) {
            return Ok(name);
        }

        let host = trim_url_protocol_and_trailing_slash(registry);
        self.host_to_name
            .get(host)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::NotRecognized(registry.to_string()))
    }
}

impl Default for RegistryTable {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_url_protocol_and_trailing_slash(url: &str) -> &str {
    let url = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")).unwrap_or(url);
    url.trim_end_matches('/')
}
