//! Transitive dependency expansion and aggregate reporting

use crate::error::LookupResult;
use crate::graph::DependencyGraph;
use crate::pom::PomClient;
use crate::service::LookupService;
use rebuild_types::Gav;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Aggregate reproducibility over a coordinate's distinct dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyReport {
    pub reproducible: u32,
    pub total: u32,
}

impl DependencyReport {
    pub fn all_reproducible(&self) -> bool {
        self.reproducible == self.total
    }
}

/// Expands a coordinate to its transitive dependency set and evaluates
/// each dependency against the index.
pub struct TransitiveExpander {
    pom: PomClient,
    graph: Arc<dyn DependencyGraph>,
}

impl TransitiveExpander {
    pub fn new(pom: PomClient, graph: Arc<dyn DependencyGraph>) -> Self {
        Self { pom, graph }
    }

    /// Expand a coordinate to the distinct set of its (and, for a BOM,
    /// its managed dependencies') transitive dependencies.
    pub async fn expand(&self, registry_host: &str, gav: &Gav) -> LookupResult<Vec<Gav>> {
        let roots = self.pom.collect_coordinates(registry_host, gav).await;
        self.expand_roots(&roots).await
    }

    /// Expand a set of root coordinates, deduplicating by
    /// (namespace, name, version) across all of them.
    pub async fn expand_roots(&self, roots: &[Gav]) -> LookupResult<Vec<Gav>> {
        let mut distinct: BTreeSet<Gav> = BTreeSet::new();

        for root in roots {
            let purl = package_url(root);
            for component in self.graph.transitive_dependencies(&purl).await? {
                distinct.insert(Gav::new(component.namespace, component.name, component.version));
            }
        }

        Ok(distinct.into_iter().collect())
    }

    /// Expand a coordinate and count how many of its distinct dependencies
    /// have a fully reproducible indexed record. A dependency without a
    /// record counts against the total (fail-closed) without aborting.
    pub async fn report(
        &self,
        lookup: &LookupService,
        registry: &str,
        gav: &Gav,
    ) -> LookupResult<DependencyReport> {
        let roots = self.pom.collect_coordinates(registry, gav).await;
        self.report_roots(lookup, registry, &roots).await
    }

    /// Evaluate an already-collected set of expansion roots.
    pub async fn report_roots(
        &self,
        lookup: &LookupService,
        registry: &str,
        roots: &[Gav],
    ) -> LookupResult<DependencyReport> {
        let dependencies = self.expand_roots(roots).await?;

        let mut report = DependencyReport {
            reproducible: 0,
            total: dependencies.len() as u32,
        };
        for dependency in &dependencies {
            match lookup.lookup_version(registry, dependency).await {
                Ok(record) if record.file_stats.project_non_reproducible_files == 0 => {
                    report.reproducible += 1;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(coordinate = %dependency, %error, "dependency counts as not reproducible");
                }
            }
        }

        Ok(report)
    }
}

fn package_url(gav: &Gav) -> String {
    format!(
        "pkg:maven/{}/{}@{}",
        gav.group_id,
        gav.artifact_id,
        gav.version.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphComponent;
    use crate::source::IndexSource;
    use async_trait::async_trait;
    use rebuild_types::{FileStats, RegistryTable, VersionRecord};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;

    /// In-memory graph: every listed root resolves to a fixed component set.
    struct FixedGraph {
        edges: BTreeMap<String, Vec<GraphComponent>>,
    }

    #[async_trait]
    impl DependencyGraph for FixedGraph {
        async fn transitive_dependencies(&self, purl: &str) -> LookupResult<Vec<GraphComponent>> {
            Ok(self.edges.get(purl).cloned().unwrap_or_default())
        }
    }

    fn component(name: &str, version: &str) -> GraphComponent {
        GraphComponent {
            namespace: "org.example".to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    fn expander(edges: BTreeMap<String, Vec<GraphComponent>>) -> TransitiveExpander {
        TransitiveExpander::new(PomClient::new().unwrap(), Arc::new(FixedGraph { edges }))
    }

    #[tokio::test]
    async fn test_shared_dependency_counts_once() {
        let edges = BTreeMap::from([
            (
                "pkg:maven/org.example/a@1.0.0".to_string(),
                vec![component("shared", "2.0.0"), component("only-a", "1.0.0")],
            ),
            (
                "pkg:maven/org.example/b@1.0.0".to_string(),
                vec![component("shared", "2.0.0"), component("only-b", "1.0.0")],
            ),
        ]);
        let roots = vec![
            Gav::new("org.example", "a", "1.0.0"),
            Gav::new("org.example", "b", "1.0.0"),
        ];

        let distinct = expander(edges).expand_roots(&roots).await.unwrap();
        assert_eq!(distinct.len(), 3);
    }

    #[tokio::test]
    async fn test_same_name_different_version_stays_distinct() {
        let edges = BTreeMap::from([(
            "pkg:maven/org.example/a@1.0.0".to_string(),
            vec![component("shared", "2.0.0"), component("shared", "2.1.0")],
        )]);
        let roots = vec![Gav::new("org.example", "a", "1.0.0")];

        let distinct = expander(edges).expand_roots(&roots).await.unwrap();
        assert_eq!(distinct.len(), 2);
    }

    fn seed_version_record(dir: &Path, artifact: &str, version: &str, non_reproducible: u32) {
        let record = VersionRecord {
            file_stats: FileStats {
                project_reproducible_files: 1,
                project_non_reproducible_files: non_reproducible,
                ..Default::default()
            },
            ..Default::default()
        };
        let base = dir.join(format!("maven/mavencentral/org/example/{artifact}"));
        fs::create_dir_all(&base).unwrap();
        fs::write(
            base.join(format!("{version}.json")),
            serde_json::to_vec(&record).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_report_is_fail_closed_for_unindexed_dependencies() {
        let index_dir = tempfile::tempdir().unwrap();
        seed_version_record(index_dir.path(), "good", "1.0.0", 0);
        seed_version_record(index_dir.path(), "bad", "1.0.0", 1);
        // "missing" has no record on purpose.

        let lookup = LookupService::new(
            RegistryTable::new(),
            IndexSource::local(index_dir.path()),
        );

        let edges = BTreeMap::from([(
            "pkg:maven/org.example/root@1.0.0".to_string(),
            vec![
                component("good", "1.0.0"),
                component("bad", "1.0.0"),
                component("missing", "1.0.0"),
            ],
        )]);
        let expander = expander(edges);

        let roots = vec![Gav::new("org.example", "root", "1.0.0")];
        let report = expander
            .report_roots(&lookup, "mavencentral", &roots)
            .await
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.reproducible, 1);
        assert!(!report.all_reproducible());
    }
}
