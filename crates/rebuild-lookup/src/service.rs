//! Coordinate lookup against the persisted index

use crate::error::{LookupError, LookupResult};
use crate::source::IndexSource;
use rebuild_types::{DependencyIndex, Gav, ProjectIndex, RegistryTable, VersionRecord};

/// Literal version token resolved through a coordinate's `latest` field.
pub const LATEST_TOKEN: &str = "latest";

const KIND_DEPENDENCY: &str = "maven";
const KIND_PROJECT: &str = "project";

/// Resolves coordinates to index documents.
pub struct LookupService {
    registries: RegistryTable,
    source: IndexSource,
}

impl LookupService {
    pub fn new(registries: RegistryTable, source: IndexSource) -> Self {
        Self { registries, source }
    }

    pub fn registries(&self) -> &RegistryTable {
        &self.registries
    }

    /// Look up the per-module index document for a coordinate.
    pub async fn lookup_dependency(
        &self,
        registry: &str,
        gav: &Gav,
    ) -> LookupResult<DependencyIndex> {
        let registry = self.registries.resolve(registry)?;
        let path = format!("{KIND_DEPENDENCY}/{registry}/{}/index.json", gav.path(true));
        self.source.fetch(&path, &gav.coordinate()).await
    }

    /// Look up the aggregated project index document for a coordinate.
    pub async fn lookup_project(&self, registry: &str, gav: &Gav) -> LookupResult<ProjectIndex> {
        let registry = self.registries.resolve(registry)?;
        let path = format!("{KIND_PROJECT}/{registry}/{}/index.json", gav.path(true));
        self.source.fetch(&path, &gav.coordinate()).await
    }

    /// Look up one version's detail record. The literal `latest` token is
    /// resolved through the coordinate's index document first.
    pub async fn lookup_version(&self, registry: &str, gav: &Gav) -> LookupResult<VersionRecord> {
        let gav = self.resolve_latest_token(registry, gav).await?;
        let registry = self.registries.resolve(registry)?;
        let path = format!("{KIND_DEPENDENCY}/{registry}/{}.json", gav.path(false));
        self.source.fetch(&path, &gav.coordinate()).await
    }

    /// Replace a `latest` version token with the indexed latest version.
    pub async fn resolve_latest_token(&self, registry: &str, gav: &Gav) -> LookupResult<Gav> {
        if gav.version.as_deref() != Some(LATEST_TOKEN) {
            return Ok(gav.clone());
        }

        let index = self.lookup_dependency(registry, gav).await?;
        if index.latest.is_empty() {
            return Err(LookupError::DependencyNotFound(gav.coordinate()));
        }
        let mut resolved = gav.clone();
        resolved.version = Some(index.latest);
        Ok(resolved)
    }
}
